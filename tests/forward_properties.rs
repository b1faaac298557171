// ============================================================
// Forward-pass properties of the sequence graph
// ============================================================
// End-to-end checks on the NdArray backend:
//   - eval passes are deterministic
//   - tokens past the length cap never affect the scores
//   - growing + rebinding equals building at the larger size
//   - seeded training passes replay exactly
//   - post-embedding dropout zeroes about 20% of dimensions

use burn::prelude::*;
use cnn_labeler_graph::{
    CpuBackend, ExecContext, Feature, HyperParams, ModelParams, SequenceGraphBuilder,
};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn values(t: &Tensor<CpuBackend, 1>) -> Vec<f32> {
    t.clone().into_data().to_vec().unwrap()
}

fn build(
    capacity: usize,
    model:    &ModelParams<CpuBackend>,
    hyper:    &HyperParams,
) -> SequenceGraphBuilder<CpuBackend> {
    let mut graph = SequenceGraphBuilder::with_capacity(capacity);
    graph.bind_parameters(model, hyper).unwrap();
    graph
}

fn sentence(len: usize, vocab: usize) -> Feature {
    Feature::new((0..len).map(|i| ((i * 7 + 3) % vocab) as u32))
}

#[test]
fn test_reference_scenario() {
    init_logging();
    let hyper  = HyperParams::new(100, 50, 100, 5, 2);
    let device = Default::default();
    let model  = hyper.init_model::<CpuBackend>(&device);
    let mut graph = build(16, &model, &hyper);
    let mut ctx   = ExecContext::new(device, 0);

    let feature = sentence(10, hyper.vocab_size);
    let first   = values(&graph.forward(&mut ctx, &feature, false).unwrap());
    let second  = values(&graph.forward(&mut ctx, &feature, false).unwrap());

    assert_eq!(first.len(), 5);
    assert!(first.iter().all(|v| v.is_finite()));
    assert_eq!(first, second);
    assert_eq!(values(graph.scores().unwrap()), second);
}

#[test]
fn test_output_length_independent_of_sentence_length() {
    let hyper  = HyperParams::new(30, 6, 8, 4, 1).with_max_sentence_length(12);
    let device = Default::default();
    let model  = hyper.init_model::<CpuBackend>(&device);
    let mut graph = build(12, &model, &hyper);
    let mut ctx   = ExecContext::new(device, 0);

    for len in 1..=12 {
        let scores = graph.forward(&mut ctx, &sentence(len, 30), false).unwrap();
        assert_eq!(scores.dims(), [4], "sentence length {len}");
    }
}

#[test]
fn test_tokens_past_cap_are_ignored() {
    init_logging();
    let hyper  = HyperParams::new(30, 6, 8, 3, 1).with_max_sentence_length(5);
    let device = Default::default();
    let model  = hyper.init_model::<CpuBackend>(&device);
    let mut graph = build(5, &model, &hyper);
    let mut ctx   = ExecContext::new(device, 0);

    let base = sentence(5, 30);
    let expected = values(&graph.forward(&mut ctx, &base, false).unwrap());

    for extra in [1usize, 4, 20] {
        let mut words = base.words.clone();
        words.extend((0..extra).map(|i| (i % 30) as u32));
        let scores = values(&graph.forward(&mut ctx, &Feature::from(words), false).unwrap());
        assert_eq!(scores, expected, "{extra} extra tokens changed the output");
    }
    assert_eq!(graph.metrics().truncated_sentences, 3);
    assert_eq!(graph.metrics().dropped_tokens, 25);
}

#[test]
fn test_growth_matches_fresh_builder() {
    let hyper  = HyperParams::new(40, 5, 7, 3, 2);
    let device = Default::default();
    let model  = hyper.init_model::<CpuBackend>(&device);
    let mut ctx = ExecContext::new(device, 0);

    let mut grown = build(3, &model, &hyper);
    grown.forward(&mut ctx, &sentence(3, 40), false).unwrap();
    grown.ensure_capacity(9);
    grown.bind_parameters(&model, &hyper).unwrap();

    let mut fresh = build(9, &model, &hyper);
    let feature   = sentence(9, 40);
    assert_eq!(
        values(&grown.forward(&mut ctx, &feature, false).unwrap()),
        values(&fresh.forward(&mut ctx, &feature, false).unwrap()),
    );
}

#[test]
fn test_seeded_training_pass_replays() {
    let hyper  = HyperParams::new(50, 10, 20, 4, 1);
    let device: <CpuBackend as Backend>::Device = Default::default();
    let model  = hyper.init_model::<CpuBackend>(&device);
    let mut graph = build(8, &model, &hyper);
    let feature   = sentence(8, 50);

    let mut run = |seed: u64| {
        let mut ctx = ExecContext::new(device.clone(), seed);
        values(&graph.forward(&mut ctx, &feature, true).unwrap())
    };
    let a = run(9);
    let b = run(9);
    let c = run(10);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_embedding_dropout_rate_is_observed() {
    let hyper  = HyperParams::new(60, 50, 16, 3, 1);
    let device: <CpuBackend as Backend>::Device = Default::default();
    let model  = hyper.init_model::<CpuBackend>(&device);
    let mut graph = build(10, &model, &hyper);
    let mut ctx   = ExecContext::from_entropy(device);
    let feature   = sentence(10, 60);

    let mut zeroed = 0usize;
    let mut total  = 0usize;
    for _ in 0..40 {
        graph.forward(&mut ctx, &feature, true).unwrap();
        for i in 0..feature.len() {
            let before = values(graph.lookup_output(i).unwrap());
            let after  = values(graph.input_dropout_output(i).unwrap());
            for (x, y) in before.iter().zip(&after) {
                if *x == 0.0 {
                    continue;
                }
                total += 1;
                if *y == 0.0 {
                    zeroed += 1;
                }
            }
        }
    }
    let fraction = zeroed as f64 / total as f64;
    assert!((fraction - 0.2).abs() < 0.02, "zeroed fraction {fraction}");
}

#[test]
fn test_one_builder_per_thread_shares_parameters() {
    let hyper  = HyperParams::new(30, 6, 8, 3, 1);
    let device: <CpuBackend as Backend>::Device = Default::default();
    let model  = hyper.init_model::<CpuBackend>(&device);
    let feature = sentence(6, 30);

    let mut graph = build(6, &model, &hyper);
    let mut ctx   = ExecContext::new(device.clone(), 0);
    let expected  = values(&graph.forward(&mut ctx, &feature, false).unwrap());

    let results: Vec<Vec<f32>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..3)
            .map(|_| {
                let model   = model.clone();
                let hyper   = hyper.clone();
                let device  = device.clone();
                let feature = feature.clone();
                s.spawn(move || {
                    let mut graph = build(6, &model, &hyper);
                    let mut ctx   = ExecContext::new(device, 0);
                    values(&graph.forward(&mut ctx, &feature, false).unwrap())
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for r in results {
        assert_eq!(r, expected);
    }
}
