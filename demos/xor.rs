use nervenet::{
    train_loop, Activation, ClassRule, CostKind, Dataset, NetworkSpec, TrainConfig,
};

fn main() {
    let spec = NetworkSpec {
        name: "xor".to_string(),
        layers: vec![
            nervenet::LayerSpec {
                size: 2,
                input_size: 2,
                activation: Activation::Sigmoid,
            },
            nervenet::LayerSpec {
                size: 1,
                input_size: 2,
                activation: Activation::Sigmoid,
            },
        ],
        cost: CostKind::Mse,
        learning_rate: 0.5,
        momentum: 0.0,
    };
    let mut network = spec.build(&mut rand::thread_rng()).expect("valid spec");

    let dataset = Dataset::from_pairs(
        2,
        1,
        vec![
            (vec![0.0, 0.0], vec![0.0]),
            (vec![0.0, 1.0], vec![1.0]),
            (vec![1.0, 0.0], vec![1.0]),
            (vec![1.0, 1.0], vec![0.0]),
        ],
    )
    .expect("uniform dataset");

    let config = TrainConfig::new(5000, 0.5, 0.0);
    let report = train_loop(&mut network, &dataset, &config).expect("training run");
    println!(
        "trained {} epochs, final loss = {:.6}",
        report.epochs_run, report.final_loss
    );

    for exemplar in &dataset {
        let output = network.predict(exemplar.input()).expect("matching input");
        println!(
            "Input: {:?} -> Output: {:.4} (target {})",
            exemplar.input(),
            output[0],
            exemplar.target()[0]
        );
    }

    let matrix = nervenet::validate(&network, &dataset, ClassRule::Threshold(0.5))
        .expect("validation run");
    println!("\n{}", matrix);
}
