use crate::expression::functions::Builtin;

/// Parsed expression tree. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal (`true`/`false`/`pi` fold to literals).
    Literal(f64),
    /// Dotted or bare name, pre-classified by [`VarTarget`].
    Variable(VarRef),
    /// Prefix operator.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
    },
    /// Infix operator.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
    /// Builtin function call.
    Call {
        /// Callee.
        func: Builtin,
        /// Arguments in source order.
        args: Vec<Expr>,
    },
    /// Conditional node. Not produced by the current grammar (`if(..)` is a call).
    Ternary {
        /// Condition.
        cond: Box<Expr>,
        /// Value when the condition is truthy.
        then: Box<Expr>,
        /// Value otherwise.
        otherwise: Box<Expr>,
    },
}

/// A variable reference as written, plus where it resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarRef {
    /// Source spelling, e.g. `head.rx`.
    pub name: String,
    /// Resolution target.
    pub target: VarTarget,
}

/// Where a variable name resolves at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarTarget {
    /// `var.<name>`: custom variable.
    Custom(String),
    /// `render.<name>`: write-only sink, always reads 0.
    Render(String),
    /// `<bone>.<property>` (including the synthetic `varb` bone).
    Bone {
        /// Bone name.
        bone: String,
        /// Property name.
        property: String,
    },
    /// Bare name: entity-state field.
    State(String),
}

impl VarRef {
    /// Classify a dotted or bare name.
    pub fn parse(name: &str) -> Self {
        let target = match name.split_once('.') {
            Some(("var", rest)) => VarTarget::Custom(rest.to_owned()),
            Some(("render", rest)) => VarTarget::Render(rest.to_owned()),
            Some((bone, property)) => VarTarget::Bone {
                bone: bone.to_owned(),
                property: property.to_owned(),
            },
            None => VarTarget::State(name.to_owned()),
        };
        Self {
            name: name.to_owned(),
            target,
        }
    }

    /// `(bone, property)` for bone references.
    pub fn as_bone_channel(&self) -> Option<(&str, &str)> {
        match &self.target {
            VarTarget::Bone { bone, property } => Some((bone.as_str(), property.as_str())),
            _ => None,
        }
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `+x`
    Plus,
    /// `!x`
    Not,
}

/// Infix operators, all left-associative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `&&`
    And,
    /// `||`
    Or,
}

impl BinaryOp {
    /// Binding power, low to high: `||`, `&&`, equality, comparison, additive, multiplicative.
    pub(crate) fn precedence(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq | Self::Ne => 3,
            Self::Lt | Self::Le | Self::Gt | Self::Ge => 4,
            Self::Add | Self::Sub => 5,
            Self::Mul | Self::Div | Self::Mod => 6,
        }
    }

    pub(crate) fn is_additive(self) -> bool {
        matches!(self, Self::Add | Self::Sub)
    }
}

impl Expr {
    /// Pre-order traversal over every node.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Expr)) {
        f(self);
        match self {
            Self::Literal(_) | Self::Variable(_) => {}
            Self::Unary { operand, .. } => operand.walk(f),
            Self::Binary { left, right, .. } => {
                left.walk(f);
                right.walk(f);
            }
            Self::Call { args, .. } => {
                for a in args {
                    a.walk(f);
                }
            }
            Self::Ternary {
                cond,
                then,
                otherwise,
            } => {
                cond.walk(f);
                then.walk(f);
                otherwise.walk(f);
            }
        }
    }

    /// Every variable reference in the tree, in traversal order.
    pub fn variables(&self) -> Vec<&VarRef> {
        let mut out = Vec::new();
        self.walk(&mut |e| {
            if let Expr::Variable(v) = e {
                out.push(v);
            }
        });
        out
    }

    /// True when the tree references `bone.property`.
    pub fn reads_bone_channel(&self, bone: &str, property: &str) -> bool {
        self.variables()
            .into_iter()
            .any(|v| v.as_bone_channel() == Some((bone, property)))
    }

    /// Numeric value of a literal or a negated literal.
    pub fn as_literal(&self) -> Option<f64> {
        match self {
            Self::Literal(v) => Some(*v),
            Self::Unary {
                op: UnaryOp::Neg,
                operand,
            } => operand.as_literal().map(|v| -v),
            Self::Unary {
                op: UnaryOp::Plus,
                operand,
            } => operand.as_literal(),
            _ => None,
        }
    }

    /// No variable reads and no `random` calls: the value never changes.
    pub fn is_constant_only(&self) -> bool {
        let mut constant = true;
        self.walk(&mut |e| match e {
            Expr::Variable(_) => constant = false,
            Expr::Call {
                func: Builtin::Random,
                ..
            } => constant = false,
            _ => {}
        });
        constant
    }
}
