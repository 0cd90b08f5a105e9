use starling::{Detector, Edge, Graph, LayoutOptions, Node};

fn graph(nodes: &[&str], edges: &[(&str, &str, u32)]) -> Graph {
    let mut g = Graph::new();
    for id in nodes {
        g.add_node(Node::new(*id));
    }
    for (a, b, w) in edges {
        g.add_edge(Edge::new(*a, *b, *w));
    }
    g
}

/// Two 5-cliques joined by a single edge, plus one isolated node.
fn barbell() -> Graph {
    let ids = ["a0", "a1", "a2", "a3", "a4", "b0", "b1", "b2", "b3", "b4", "solo"];
    let mut edges: Vec<(&str, &str, u32)> = Vec::new();
    for side in [&ids[0..5], &ids[5..10]] {
        for i in 0..side.len() {
            for j in (i + 1)..side.len() {
                edges.push((side[i], side[j], 2));
            }
        }
    }
    edges.push(("a0", "b0", 1));
    graph(&ids, &edges)
}

#[test]
fn barbell_splits_into_its_two_cliques() {
    let opts = LayoutOptions::default().with_seed(31);
    let found = starling::communities(&barbell(), &opts).expect("communities");

    assert_eq!(found.detector, Detector::Louvain);
    assert_eq!(found.count, 2);
    assert_eq!(found.sizes, vec![5, 5]);
    assert_eq!(found.membership["solo"], None);

    let a = found.membership["a0"];
    let b = found.membership["b0"];
    assert_ne!(a, b);
    for id in ["a1", "a2", "a3", "a4"] {
        assert_eq!(found.membership[id], a, "{id}");
    }
    for id in ["b1", "b2", "b3", "b4"] {
        assert_eq!(found.membership[id], b, "{id}");
    }
    assert!(found.modularity > 0.0);
}

#[test]
fn detection_is_repeatable_for_a_fixed_seed() {
    let g = barbell();
    let opts = LayoutOptions::default().with_seed(99);
    let first = starling::communities(&g, &opts).expect("communities");
    let second = starling::communities(&g, &opts).expect("communities");
    assert_eq!(first, second);
}

#[test]
fn path_is_one_community_at_unit_and_low_resolution() {
    let g = graph(&["a", "b", "c"], &[("a", "b", 1), ("b", "c", 1)]);
    for resolution in [1.0, 0.5] {
        let opts = LayoutOptions {
            resolution,
            ..LayoutOptions::default().with_seed(5)
        };
        let found = starling::communities(&g, &opts).expect("communities");
        assert_eq!(found.count, 1, "resolution {resolution}");
        assert_eq!(found.sizes, vec![3]);
        assert!(found.modularity.abs() < 1e-12);
    }
}

#[test]
fn default_resolution_splits_the_path() {
    let g = graph(&["a", "b", "c"], &[("a", "b", 1), ("b", "c", 1)]);
    let found = starling::communities(&g, &LayoutOptions::default().with_seed(5))
        .expect("communities");
    assert_eq!(found.count, 2);
    assert_eq!(found.sizes, vec![2, 1]);
    assert_eq!(found.membership["b"], Some(0));
}

/// Eight triangles in a ring, consecutive triangles joined by a single edge.
fn ring_of_triangles() -> Graph {
    let mut g = Graph::new();
    for t in 0..8 {
        for i in 0..3 {
            g.add_node(Node::new(format!("t{t}_{i}")));
        }
    }
    for t in 0..8 {
        g.add_edge(Edge::new(format!("t{t}_0"), format!("t{t}_1"), 1))
            .add_edge(Edge::new(format!("t{t}_1"), format!("t{t}_2"), 1))
            .add_edge(Edge::new(format!("t{t}_2"), format!("t{t}_0"), 1))
            .add_edge(Edge::new(format!("t{t}_2"), format!("t{}_0", (t + 1) % 8), 1));
    }
    g
}

#[test]
fn raising_the_resolution_yields_more_communities() {
    let g = ring_of_triangles();
    let count = |resolution: f64| {
        let opts = LayoutOptions {
            resolution,
            ..LayoutOptions::default().with_seed(7)
        };
        starling::communities(&g, &opts).expect("communities").count
    };
    let low = count(0.5);
    let high = count(2.0);
    assert_eq!(high, 8);
    assert!(low < high, "0.5 -> {low}, 2.0 -> {high}");
}

#[test]
fn zero_weight_edges_fall_back_to_label_propagation() {
    let g = graph(&["a", "b", "c"], &[("a", "b", 0), ("b", "c", 0)]);
    let found = starling::communities(&g, &LayoutOptions::default().with_seed(1))
        .expect("communities");
    assert_eq!(found.detector, Detector::LabelPropagation);
    assert!(found.membership.values().all(Option::is_some));
}

#[test]
fn edgeless_graph_has_no_communities() {
    let g = graph(&["a", "b"], &[]);
    let found = starling::communities(&g, &LayoutOptions::default().with_seed(1))
        .expect("communities");
    assert_eq!(found.count, 0);
    assert!(found.sizes.is_empty());
    assert!(found.membership.values().all(Option::is_none));
}

#[test]
fn stats_describe_the_barbell() {
    let g = barbell().to_graphlib().expect("valid");
    let stats = starling::NetworkStats::compute(&g);
    assert_eq!(stats.nodes, 11);
    assert_eq!(stats.edges, 21);
    assert_eq!(stats.total_weight, 41);
    assert_eq!(stats.components, 2);
    assert_eq!(stats.largest_component, 10);
    assert_eq!(stats.isolated, 1);
    assert_eq!(stats.max_degree, 5);
    assert_eq!(stats.diameter, 3);
}

#[test]
fn bridge_ends_carry_the_highest_betweenness() {
    let g = barbell().to_graphlib().expect("valid");
    let bc = starling::metrics::betweenness_centrality(&g);
    let (top, _) = bc
        .iter()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .expect("non-empty");
    assert!(top == "a0" || top == "b0");
    assert_eq!(bc["solo"], 0.0);
}
