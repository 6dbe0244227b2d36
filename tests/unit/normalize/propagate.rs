use super::*;

fn key(s: &str) -> ChannelKey {
    let (t, p) = s.split_once('.').unwrap();
    ChannelKey::new(t, p)
}

fn graph(edges: &[(&str, &str)]) -> DependencyGraph {
    let mut g = DependencyGraph::new();
    for (w, r) in edges {
        g.entry(key(w)).or_default().insert(key(r));
    }
    g
}

#[test]
fn flags_reach_every_transitive_reader() {
    let g = graph(&[
        ("c.ty", "b.ty"),
        ("b.ty", "var.bob"),
        ("var.bob", "a.ty"),
        ("d.ty", "e.ty"),
    ]);
    let seeds = BTreeSet::from([key("a.ty")]);
    let out = propagate_flags(&seeds, &g);
    let want = BTreeSet::from([key("a.ty"), key("var.bob"), key("b.ty"), key("c.ty")]);
    assert_eq!(out, want);
}

#[test]
fn order_of_edges_does_not_matter() {
    // `a` sorts before the channel it depends on, so one sweep is not enough.
    let g = graph(&[("a.tx", "b.tx"), ("b.tx", "z.tx")]);
    let out = propagate_flags(&BTreeSet::from([key("z.tx")]), &g);
    assert!(out.contains(&key("a.tx")));
}

#[test]
fn cycles_terminate() {
    let g = graph(&[("a.tx", "b.tx"), ("b.tx", "a.tx")]);
    let out = propagate_flags(&BTreeSet::from([key("b.tx")]), &g);
    assert_eq!(out.len(), 2);
    let none = propagate_flags(&BTreeSet::new(), &g);
    assert!(none.is_empty());
}
