#![cfg(feature = "serde")]

use phylo_shapley::{IndexError, IndexSession, WeightTable, parse_enewick};

const NETWORK: &str = "((1,(3,#H1)c)a,(2,((4)H#H1,5)d)b)r;";

#[test]
fn test_weights_file_loads_indented_records() {
    let table = WeightTable::from_path("tests/data/weights.csv").expect("weights file loads");
    assert_eq!(table.len(), 5);
    assert_eq!(table.get("H", "4"), Some(0.5));
    assert_eq!(table.get("r", "b"), Some(0.2));
}

#[test]
fn test_weights_file_drives_indices() {
    let table = WeightTable::from_path("tests/data/weights.csv").unwrap();
    let mut network = parse_enewick(NETWORK).unwrap();
    assert_eq!(network.assign_weights(&table), 5);

    let session = IndexSession::new(&network);
    let targets = network.nodes_by_taxa(&["3", "4"]).unwrap();
    assert!((session.rooted_phylogenetic_diversity(&targets) - 1.5).abs() < 1e-12);

    let four = network.node_by_taxon("4").unwrap();
    assert!((session.fair_proportion(four) - 0.95).abs() < 1e-12);
}

#[test]
fn test_table_pairs_absent_from_network_are_ignored() {
    let table =
        WeightTable::from_reader("r,a,0.1\nx,y,5\na,r,7\n".as_bytes()).expect("table loads");
    let mut network = parse_enewick(NETWORK).unwrap();
    assert_eq!(network.assign_weights(&table), 1);
    assert!((IndexSession::new(&network).total_weight() - 0.1).abs() < 1e-12);
}

#[test]
fn test_malformed_weights_file() {
    let result = WeightTable::from_path("tests/data/bad_weights.csv");
    assert!(matches!(result, Err(IndexError::WeightTable(_))));
}

#[test]
fn test_missing_weights_file() {
    let result = WeightTable::from_path("tests/data/no_such_file.csv");
    assert!(matches!(result, Err(IndexError::Io(_))));
}

#[test]
fn test_weights_file_replaces_branch_lengths() {
    let table = WeightTable::from_path("tests/data/weights.csv").unwrap();
    let mut network =
        parse_enewick("((1:2.0,(3,#H1)c)a:7,(2:1.5,((4)H#H1,5)d)b)r;").unwrap();
    network.assign_weights(&table);

    let session = IndexSession::new(&network);
    assert!((session.total_weight() - 1.5).abs() < 1e-12);

    let by_table = IndexSession::with_weights(&network, &table);
    for &leaf in network.leaves() {
        assert_eq!(session.fair_proportion(leaf), by_table.fair_proportion(leaf));
    }
}
