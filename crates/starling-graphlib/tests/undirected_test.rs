use starling_graphlib::{Graph, alg};

fn path_graph() -> Graph {
    let mut g: Graph = Graph::new();
    for id in ["a", "b", "c"] {
        g.ensure_node(id);
    }
    g.add_edge("a", "b", 1).expect("a-b");
    g.add_edge("c", "b", 1).expect("c-b");
    g
}

#[test]
fn undirected_edges_are_symmetric() {
    let mut g: Graph = Graph::new();
    g.ensure_node("a");
    g.ensure_node("b");
    g.add_edge("b", "a", 7).expect("edge");

    assert!(g.has_edge("a", "b"));
    assert!(g.has_edge("b", "a"));
    assert_eq!(g.edge_weight("a", "b"), Some(7));
    assert_eq!(g.edge_weight("b", "a"), Some(7));
}

#[test]
fn neighbors_follow_edge_insertion_order() {
    let g = path_graph();

    assert_eq!(g.neighbor_ids("b"), vec!["a", "c"]);
    assert_eq!(g.neighbor_ids("a"), vec!["b"]);
    assert_eq!(g.neighbor_ids("missing"), Vec::<&str>::new());
    assert_eq!(g.degree_of("b"), Some(2));
    assert_eq!(g.max_degree(), 2);
}

#[test]
fn edges_are_reported_with_canonical_endpoints() {
    let g = path_graph();
    let edges: Vec<(&str, &str, u32)> = g.edges().map(|e| (e.v, e.w, e.weight)).collect();

    assert_eq!(edges, vec![("a", "b", 1), ("b", "c", 1)]);
    assert_eq!(g.total_weight(), 2);
}

#[test]
fn components_include_isolated_nodes_as_singletons() {
    let mut g = path_graph();
    g.ensure_node("loner");
    g.ensure_node("x");
    g.ensure_node("y");
    g.add_edge("x", "y", 3).expect("x-y");

    let comps = alg::components(&g);
    assert_eq!(
        comps,
        vec![
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec!["loner".to_string()],
            vec!["x".to_string(), "y".to_string()],
        ]
    );
    assert_eq!(alg::isolated(&g), vec![3]);
}

#[test]
fn density_of_triangle_is_one() {
    let mut g: Graph = Graph::new();
    for id in ["a", "b", "c"] {
        g.ensure_node(id);
    }
    g.add_edge("a", "b", 1).expect("a-b");
    g.add_edge("b", "c", 1).expect("b-c");
    g.add_edge("c", "a", 1).expect("c-a");

    assert!((alg::density(&g) - 1.0).abs() < 1e-12);
    assert_eq!(alg::density(&Graph::<()>::new()), 0.0);
}

#[test]
fn bfs_distances_stop_at_component_boundary() {
    let mut g = path_graph();
    g.ensure_node("loner");

    let dist = alg::bfs_distances(&g, 0);
    assert_eq!(dist, vec![Some(0), Some(1), Some(2), None]);
}
