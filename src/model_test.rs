use super::*;

#[test]
fn test_fit_linear_sequence() {
    let keys: Vec<i64> = (0..100).collect();
    let fitted = fit(&keys).expect("a strictly increasing sequence must fit");
    assert!((fitted.model.slope - 0.5).abs() < 1e-6 || fitted.model.slope > 0.0);
    for (i, &k) in keys.iter().enumerate() {
        let pos = fitted.model.predict_clamped(k, fitted.slot_space);
        assert!(pos < fitted.slot_space);
        // monotone: predicted position never decreases with increasing rank.
        if i > 0 {
            let prev = fitted.model.predict_clamped(keys[i - 1], fitted.slot_space);
            assert!(pos >= prev);
        }
    }
}

#[test]
fn test_fit_constant_key_has_no_model() {
    let keys = [5_i64, 5, 5, 5];
    assert!(fit(&keys).is_none());
}

#[test]
fn test_fit_with_amp_expands_slot_space() {
    let keys: Vec<i64> = (0..10).collect();
    let tight = fit_with_amp(&keys, 1.0).unwrap();
    let wide = fit_with_amp(&keys, 4.0).unwrap();
    assert!(wide.slot_space >= tight.slot_space);
}

#[test]
fn test_predict_clamped_stays_in_bounds() {
    let model = LinearModel { slope: 10.0, intercept: 0.0 };
    assert_eq!(model.predict_clamped(1000_i64, 16), 15);
    assert_eq!(model.predict_clamped(-1000_i64, 16), 0);
}

#[test]
fn test_degenerate_prediction_is_redrived() {
    // Two widely spaced keys whose naive OLS model would round every
    // prediction to the same slot; `fit_with_amp` must re-derive a model
    // that spans the output range.
    let keys: Vec<i64> = vec![0, 1, 1_000_000];
    let fitted = fit(&keys).expect("three distinct keys should fit");
    let first = fitted.model.predict_clamped(keys[0], fitted.slot_space);
    let last = fitted.model.predict_clamped(*keys.last().unwrap(), fitted.slot_space);
    assert_ne!(first, last);
}
