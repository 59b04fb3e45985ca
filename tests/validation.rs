use std::fs;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;

use nervenet::{
    execute, validate, Activation, ClassRule, CostKind, Dataset, LayerSpec, NetError, Network,
    NetworkSpec,
};

fn temp_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("nervenet-test-{}-{}", std::process::id(), name));
    path
}

fn classifier_spec() -> NetworkSpec {
    NetworkSpec {
        name: "classifier".to_string(),
        layers: vec![
            LayerSpec {
                size: 4,
                input_size: 3,
                activation: Activation::Tanh,
            },
            LayerSpec {
                size: 2,
                input_size: 4,
                activation: Activation::Softmax,
            },
        ],
        cost: CostKind::CrossEntropy,
        learning_rate: 0.1,
        momentum: 0.2,
    }
}

/// A 2-in 2-out network that passes its input straight through, so the
/// arg-max of the prediction always matches the arg-max of the input.
const IDENTITY_NETWORK_JSON: &str = r#"{
  "layers": [
    {
      "size": 2,
      "input_size": 2,
      "weights": { "rows": 2, "cols": 2, "data": [1.0, 0.0, 0.0, 1.0] },
      "biases": { "rows": 1, "cols": 2, "data": [0.0, 0.0] },
      "activation": "Linear"
    }
  ],
  "cost": "mse",
  "learning_rate": 0.1,
  "momentum": 0.0
}"#;

#[test]
fn save_load_round_trip_preserves_predictions() {
    let mut rng = StdRng::seed_from_u64(99);
    let network = classifier_spec().build(&mut rng).unwrap();
    let input = [0.25, -1.5, 0.75];
    let before = network.predict(&input).unwrap();

    let path = temp_path("round-trip.json");
    network.save(&path).unwrap();
    let restored = Network::load(&path).unwrap();
    fs::remove_file(&path).ok();

    let after = restored.predict(&input).unwrap();
    assert_eq!(before.len(), after.len());
    for (b, a) in before.iter().zip(after.iter()) {
        assert!((b - a).abs() < 1e-12, "{} != {}", b, a);
    }
    assert_eq!(restored.cost(), CostKind::CrossEntropy);
    assert_eq!(restored.learning_rate(), 0.1);
    assert_eq!(restored.momentum(), 0.2);
}

#[test]
fn load_rejects_mismatched_dimension_chain() {
    let path = temp_path("broken-chain.json");
    fs::write(
        &path,
        r#"{
          "layers": [
            {
              "size": 2,
              "input_size": 2,
              "weights": { "rows": 2, "cols": 2, "data": [0.1, 0.2, 0.3, 0.4] },
              "biases": { "rows": 1, "cols": 2, "data": [0.0, 0.0] },
              "activation": "Sigmoid"
            },
            {
              "size": 1,
              "input_size": 3,
              "weights": { "rows": 3, "cols": 1, "data": [0.1, 0.2, 0.3] },
              "biases": { "rows": 1, "cols": 1, "data": [0.0] },
              "activation": "Sigmoid"
            }
          ],
          "cost": "mse",
          "learning_rate": 0.1,
          "momentum": 0.0
        }"#,
    )
    .unwrap();

    let result = Network::load(&path);
    fs::remove_file(&path).ok();
    assert!(matches!(result, Err(NetError::CorruptModel(_))));
}

#[test]
fn load_rejects_unknown_activation_tag() {
    let path = temp_path("unknown-tag.json");
    fs::write(
        &path,
        IDENTITY_NETWORK_JSON.replace("\"Linear\"", "\"Sigmoidal\""),
    )
    .unwrap();

    let result = Network::load(&path);
    fs::remove_file(&path).ok();
    assert!(matches!(result, Err(NetError::CorruptModel(_))));
}

#[test]
fn load_rejects_malformed_weight_shape() {
    let path = temp_path("bad-shape.json");
    fs::write(
        &path,
        IDENTITY_NETWORK_JSON.replace("\"rows\": 2, \"cols\": 2", "\"rows\": 2, \"cols\": 3"),
    )
    .unwrap();

    let result = Network::load(&path);
    fs::remove_file(&path).ok();
    assert!(matches!(result, Err(NetError::CorruptModel(_))));
}

#[test]
fn perfect_predictions_give_a_diagonal_matrix() {
    let path = temp_path("identity.json");
    fs::write(&path, IDENTITY_NETWORK_JSON).unwrap();
    let network = Network::load(&path).unwrap();
    fs::remove_file(&path).ok();

    let dataset = Dataset::from_pairs(
        2,
        2,
        vec![
            (vec![1.0, 0.0], vec![1.0, 0.0]),
            (vec![0.0, 1.0], vec![0.0, 1.0]),
            (vec![0.9, 0.1], vec![1.0, 0.0]),
            (vec![0.2, 0.8], vec![0.0, 1.0]),
        ],
    )
    .unwrap();

    let matrix = validate(&network, &dataset, ClassRule::ArgMax).unwrap();
    assert_eq!(matrix.total(), 4);
    assert_eq!(matrix.accuracy(), 1.0);
    for actual in 0..2 {
        for predicted in 0..2 {
            if actual != predicted {
                assert_eq!(matrix.count(actual, predicted), 0);
            }
        }
    }
}

#[test]
fn matrix_cell_sum_equals_dataset_size() {
    let mut rng = StdRng::seed_from_u64(5);
    let network = classifier_spec().build(&mut rng).unwrap();

    let pairs: Vec<(Vec<f64>, Vec<f64>)> = (0..7)
        .map(|i| {
            let x = i as f64;
            let one_hot = if i % 2 == 0 {
                vec![1.0, 0.0]
            } else {
                vec![0.0, 1.0]
            };
            (vec![x * 0.1, 1.0 - x * 0.2, x], one_hot)
        })
        .collect();
    let dataset = Dataset::from_pairs(3, 2, pairs).unwrap();

    let matrix = validate(&network, &dataset, ClassRule::ArgMax).unwrap();
    let cell_sum: u32 = (0..matrix.classes())
        .flat_map(|a| (0..matrix.classes()).map(move |p| (a, p)))
        .map(|(a, p)| matrix.count(a, p))
        .sum();
    assert_eq!(cell_sum, 7);
    assert_eq!(matrix.total(), 7);
}

#[test]
fn validate_rejects_empty_dataset() {
    let mut rng = StdRng::seed_from_u64(1);
    let network = classifier_spec().build(&mut rng).unwrap();
    let empty = Dataset::from_pairs(3, 2, Vec::new()).unwrap();
    assert!(matches!(
        validate(&network, &empty, ClassRule::ArgMax),
        Err(NetError::EmptyDataset)
    ));
}

#[test]
fn validate_rejects_threshold_rule_on_multi_output() {
    let mut rng = StdRng::seed_from_u64(2);
    let network = classifier_spec().build(&mut rng).unwrap();
    let dataset = Dataset::from_pairs(3, 2, vec![(vec![0.0; 3], vec![1.0, 0.0])]).unwrap();
    assert!(matches!(
        validate(&network, &dataset, ClassRule::Threshold(0.5)),
        Err(NetError::InvalidConfig(_))
    ));
}

#[test]
fn execution_is_lazy_ordered_and_restartable() {
    let mut rng = StdRng::seed_from_u64(3);
    let network = classifier_spec().build(&mut rng).unwrap();
    let dataset = Dataset::from_pairs(
        3,
        2,
        vec![
            (vec![0.1, 0.2, 0.3], vec![1.0, 0.0]),
            (vec![0.4, 0.5, 0.6], vec![0.0, 1.0]),
            (vec![0.7, 0.8, 0.9], vec![1.0, 0.0]),
        ],
    )
    .unwrap();

    let execution = execute(&network, &dataset);
    let first: Vec<Vec<f64>> = execution.run().map(|r| r.unwrap()).collect();
    assert_eq!(first.len(), 3);
    for (out, ex) in first.iter().zip(dataset.iter()) {
        let direct = network.predict(ex.input()).unwrap();
        assert_eq!(out, &direct);
    }

    // A second pass over the same value yields the same sequence.
    let second: Vec<Vec<f64>> = execution.run().map(|r| r.unwrap()).collect();
    assert_eq!(first, second);
}

#[test]
fn spec_round_trips_through_json() {
    let spec = classifier_spec();
    let path = temp_path("spec.json");
    spec.save_json(&path).unwrap();
    let restored = NetworkSpec::load_json(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(restored.name, spec.name);
    assert_eq!(restored.layers.len(), spec.layers.len());
    assert_eq!(restored.cost, spec.cost);
}
