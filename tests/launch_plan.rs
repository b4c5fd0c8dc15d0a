use gcn_launch::{
    JobCoordinates, LaunchConfigBuilder, LaunchError, Trainer, TrainingParameters,
    configs::{COORDINATOR_PORT, DEVICES_PER_NODE},
};

fn reddit() -> TrainingParameters {
    TrainingParameters::new("reddit", 128, 2).with_epochs(10)
}

fn coordinator(rank: usize, world_size: usize) -> JobCoordinates {
    JobCoordinates::new(rank, world_size, "10.242.66.105")
}

#[test]
fn plan_is_deterministic() {
    let builder = LaunchConfigBuilder::new();

    for (rank, world_size, replication) in [(0, 1, 1), (0, 4, 2), (3, 4, 4), (5, 8, 2)] {
        let job = coordinator(rank, world_size);
        let training = TrainingParameters::new("Amazon", 64, replication);

        let first = builder.build(&job, &training).unwrap();
        let second = builder.build(&job, &training).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn plan_has_baseline_then_replicated() {
    let descriptors = gcn_launch::plan(&coordinator(0, 4), &reddit()).unwrap();

    assert_eq!(descriptors.len(), 2);
    assert_eq!(descriptors[0].trainer, Trainer::Baseline);
    assert_eq!(descriptors[1].trainer, Trainer::Replicated);
    assert_ne!(descriptors[0].program(), descriptors[1].program());
}

#[test]
fn descriptors_differ_only_by_replication() {
    let descriptors = gcn_launch::plan(&coordinator(1, 4), &reddit()).unwrap();
    let (baseline, replicated) = (&descriptors[0], &descriptors[1]);

    let extra: Vec<_> = replicated
        .args
        .iter()
        .filter(|arg| !baseline.args.contains(*arg))
        .collect();

    assert_eq!(extra, ["--replication=2"]);
    assert_eq!(&replicated.args[..baseline.args.len()], &baseline.args[..]);
    assert_eq!(baseline.env, replicated.env);
}

#[test]
fn reddit_scenario() {
    let descriptors = gcn_launch::plan(&coordinator(0, 4), &reddit()).unwrap();

    for descriptor in &descriptors {
        assert!(descriptor.args.contains(&"--graphname=reddit".to_string()));
        assert!(descriptor.args.contains(&"--midlayer=128".to_string()));
        assert!(descriptor.args.contains(&"--epochs=10".to_string()));
        assert_eq!(descriptor.flag_value("hostname"), Some("10.242.66.105"));
        assert_eq!(descriptor.flag_value("world-size"), Some("4"));
        assert_eq!(descriptor.flag_value("rank"), Some("0"));
    }

    assert_eq!(descriptors[0].flag_value("replication"), None);
    assert_eq!(descriptors[1].flag_value("replication"), Some("2"));
}

#[test]
fn port_and_devices_are_constant() {
    let port = COORDINATOR_PORT.to_string();
    let devices = DEVICES_PER_NODE.to_string();

    for (rank, world_size) in [(0, 2), (1, 2), (7, 16)] {
        let training = TrainingParameters::new("Cora", 16, 2).with_epochs(rank + 1);
        let descriptors = gcn_launch::plan(&coordinator(rank, world_size), &training).unwrap();

        for descriptor in &descriptors {
            assert_eq!(descriptor.flag_value("port"), Some("12394"));
            assert_eq!(descriptor.flag_value("port"), Some(port.as_str()));
            assert_eq!(descriptor.flag_value("accperrank"), Some(devices.as_str()));
        }
    }
}

#[test]
fn invalid_inputs_produce_nothing() {
    let cases = [
        (coordinator(3, 2), TrainingParameters::new("reddit", 128, 1)),
        (coordinator(0, 0), reddit()),
        (coordinator(0, 4), TrainingParameters::new("", 128, 2)),
    ];

    for (job, training) in cases {
        let res = gcn_launch::plan(&job, &training);
        assert!(
            matches!(res, Err(LaunchError::InvalidConfig(_))),
            "expected InvalidConfig for {job:?}, got {res:?}"
        );
    }
}
