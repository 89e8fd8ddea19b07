use phylo_shapley::{IndexError, IndexSession, parse_enewick};

const NETWORK: &str = "((1,(3,#H1)c)a,(2,((4)H#H1,5)d)b)r;";

#[test]
fn test_unknown_taxon_aborts_lookup() {
    let network = parse_enewick(NETWORK).unwrap();
    let result = network.nodes_by_taxa(&["1", "6", "7"]);
    match result {
        Err(IndexError::UnknownTaxon(name)) => assert_eq!(name, "6"),
        other => panic!("Expected UnknownTaxon error, got {other:?}"),
    }
}

#[test]
fn test_internal_and_hybrid_labels_resolve() {
    let network = parse_enewick(NETWORK).unwrap();
    let nodes = network.nodes_by_taxa(&["r", "c", "H"]).unwrap();
    assert_eq!(nodes[0], network.root());
    assert!(network.is_hybrid(nodes[2]));

    let session = IndexSession::new(&network);
    assert_eq!(session.kappa().get(nodes[1]), 2);
}

#[test]
fn test_ambiguous_taxon() {
    let network = parse_enewick("((A,B)x,(A,C)y)r;").unwrap();
    let result = network.node_by_taxon("A");
    assert!(matches!(
        result,
        Err(IndexError::AmbiguousTaxon { count: 2, .. })
    ));
    assert!(network.node_by_taxon("B").is_ok());
}

#[test]
fn test_malformed_network_reports_position() {
    let result = parse_enewick("((1,2)a,3)r");
    match result {
        Err(IndexError::MalformedNetwork { position, message }) => {
            assert_eq!(position, 11);
            assert!(message.contains("';'"), "unexpected message: {message}");
        }
        other => panic!("Expected MalformedNetwork error, got {other:?}"),
    }
}

#[test]
fn test_cyclic_network_rejected() {
    let result = parse_enewick("((#H1)a,b)H#H1;");
    assert!(matches!(result, Err(IndexError::CyclicNetwork { .. })));
}

#[test]
fn test_shapley_undefined_for_internal_node() {
    let network = parse_enewick("((#H1)x:1,((a,b)H#H1)y)r;").unwrap();
    let session = IndexSession::new(&network);
    let y = network.node_by_taxon("y").unwrap();

    assert!(matches!(
        session.cophenetic_shapley_value(y),
        Err(IndexError::NoComplementLeaves { .. })
    ));
    assert!(matches!(
        session.unrooted_shapley_value(y),
        Err(IndexError::NoComplementLeaves { .. })
    ));
    // Fair proportion has no such restriction
    assert!(session.fair_proportion(y).is_finite());
}
