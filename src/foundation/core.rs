use std::fmt;

/// Pixels per scene unit in JEM geometry.
pub const DEFAULT_PIXELS_PER_UNIT: f64 = 16.0;

/// Index of a node inside a [`crate::Skeleton`]. Index 0 is always the model root.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct BoneIdx(pub u32);

impl BoneIdx {
    pub(crate) const ROOT: BoneIdx = BoneIdx(0);

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// One of the three spatial axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    Z,
}

impl Axis {
    /// All three axes in `x, y, z` order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Array slot for this axis.
    pub fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Lowercase axis letter.
    pub fn letter(self) -> char {
        match self {
            Self::X => 'x',
            Self::Y => 'y',
            Self::Z => 'z',
        }
    }

    /// Parse an axis letter, case-insensitively.
    pub fn from_letter(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'x' => Some(Self::X),
            'y' => Some(Self::Y),
            'z' => Some(Self::Z),
            _ => None,
        }
    }
}

/// Compact set of axes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AxisSet(u8);

impl AxisSet {
    /// The set with no axes.
    pub const EMPTY: AxisSet = AxisSet(0);

    /// Add `axis` to the set.
    pub fn insert(&mut self, axis: Axis) {
        self.0 |= 1 << axis.index();
    }

    /// Whether `axis` is in the set.
    pub fn contains(self, axis: Axis) -> bool {
        self.0 & (1 << axis.index()) != 0
    }

    /// True when no axis is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Contained axes in `x, y, z` order.
    pub fn iter(self) -> impl Iterator<Item = Axis> {
        Axis::ALL.into_iter().filter(move |a| self.contains(*a))
    }
}

impl FromIterator<Axis> for AxisSet {
    fn from_iter<I: IntoIterator<Item = Axis>>(iter: I) -> Self {
        let mut s = AxisSet::EMPTY;
        for a in iter {
            s.insert(a);
        }
        s
    }
}

/// Axes whose sign is flipped between CEM space and scene space (`invertAxis` in JEM).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct InvertAxis(AxisSet);

impl InvertAxis {
    /// Parse an `invertAxis` string such as `"xy"`. Unknown characters are ignored.
    pub fn parse(s: &str) -> Self {
        Self(s.chars().filter_map(Axis::from_letter).collect())
    }

    /// Whether `axis` is inverted.
    pub fn contains(self, axis: Axis) -> bool {
        self.0.contains(axis)
    }

    /// `-1.0` for inverted axes, `1.0` otherwise.
    pub fn sign(self, axis: Axis) -> f64 {
        if self.contains(axis) { -1.0 } else { 1.0 }
    }
}

impl fmt::Display for InvertAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for a in self.0.iter() {
            write!(f, "{}", a.letter())?;
        }
        Ok(())
    }
}

impl serde::Serialize for InvertAxis {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for InvertAxis {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}

/// A bone property that the animation language can read or write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    /// `tx`/`ty`/`tz`, in pixels.
    Translate(Axis),
    /// `rx`/`ry`/`rz`, in radians.
    Rotate(Axis),
    /// `sx`/`sy`/`sz`.
    Scale(Axis),
    /// `visible`.
    Visible,
    /// `visible_boxes`.
    VisibleBoxes,
}

impl Channel {
    /// Parse a property name such as `rx` or `visible`.
    pub fn parse(property: &str) -> Option<Self> {
        match property {
            "visible" => return Some(Self::Visible),
            "visible_boxes" => return Some(Self::VisibleBoxes),
            _ => {}
        }
        let mut chars = property.chars();
        let kind = chars.next()?;
        let axis = Axis::from_letter(chars.next()?)?;
        if chars.next().is_some() {
            return None;
        }
        match kind {
            't' => Some(Self::Translate(axis)),
            'r' => Some(Self::Rotate(axis)),
            's' => Some(Self::Scale(axis)),
            _ => None,
        }
    }

    /// Property name as written in expressions.
    pub fn name(self) -> &'static str {
        match self {
            Self::Translate(Axis::X) => "tx",
            Self::Translate(Axis::Y) => "ty",
            Self::Translate(Axis::Z) => "tz",
            Self::Rotate(Axis::X) => "rx",
            Self::Rotate(Axis::Y) => "ry",
            Self::Rotate(Axis::Z) => "rz",
            Self::Scale(Axis::X) => "sx",
            Self::Scale(Axis::Y) => "sy",
            Self::Scale(Axis::Z) => "sz",
            Self::Visible => "visible",
            Self::VisibleBoxes => "visible_boxes",
        }
    }

    /// Translation or rotation.
    pub fn is_transform(self) -> bool {
        matches!(self, Self::Translate(_) | Self::Rotate(_))
    }
}

/// `target.property` pair naming one readable/writable channel (`head.rx`, `var.swing`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChannelKey {
    /// Bone name, or `var`/`varb`/`render`.
    pub target: String,
    /// Channel or variable name.
    pub property: String,
}

impl ChannelKey {
    /// Build a key from its two halves.
    pub fn new(target: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            property: property.into(),
        }
    }

    /// The bone channel this key names, if the property is one.
    pub fn channel(&self) -> Option<Channel> {
        Channel::parse(&self.property)
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.target, self.property)
    }
}

/// Per-axis values stored as a fixed array, indexed by [`Axis::index`].
pub type AxisArray<T> = [T; 3];

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
