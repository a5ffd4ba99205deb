use estimate_core::{
    compute_estimate, estimate, estimate_to_hours, finalize, generate_session_code_with,
    marginal_contribution, validate, Breakpoints, CatalogFactor, CompleteFactors, DesignerLevel,
    Effort, EstimationFactors, FactorChoice, Fidelity, HoursBucket, SprintAllocation, TShirtSize,
    MAX_POINTS,
};
use estimate_core::session_code::{SESSION_CODE_ALPHABET, SESSION_CODE_LENGTH};
use estimate_test_utils::arb_complete_factors;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn raw_of(factors: &CompleteFactors) -> u32 {
    estimate(factors).raw
}

fn assert_non_decreasing<T: CatalogFactor>(
    factors: &CompleteFactors,
    set: impl Fn(&mut CompleteFactors, T),
) -> Result<(), TestCaseError> {
    let mut prev = None;
    for &variant in T::ALL {
        let mut f = factors.clone();
        set(&mut f, variant);
        let raw = raw_of(&f);
        if let Some(p) = prev {
            prop_assert!(raw >= p, "{:?} dropped from {} to {}", T::KIND, p, raw);
        }
        prev = Some(raw);
    }
    Ok(())
}

proptest! {
    #[test]
    fn prop_compute_is_deterministic(factors in arb_complete_factors()) {
        let raw = EstimationFactors::from(&factors);
        prop_assert_eq!(compute_estimate(&raw), compute_estimate(&raw));
        prop_assert_eq!(estimate(&factors), estimate(&factors));
    }

    #[test]
    fn prop_stored_shape_round_trips(factors in arb_complete_factors()) {
        let raw = EstimationFactors::from(&factors);
        prop_assert_eq!(validate(&raw).ok(), Some(factors));
    }

    #[test]
    fn prop_weighted_factors_are_monotone(factors in arb_complete_factors()) {
        assert_non_decreasing::<Effort>(&factors, |f, v| f.effort = v)?;
        assert_non_decreasing::<SprintAllocation>(&factors, |f, v| f.sprints = v)?;
        assert_non_decreasing::<Breakpoints>(&factors, |f, v| f.breakpoints = v)?;
        assert_non_decreasing::<Fidelity>(&factors, |f, v| f.fidelity = v)?;
        // DesignerLevel::ALL runs from lightest to heaviest weight
        assert_non_decreasing::<DesignerLevel>(&factors, |f, v| f.designer_levels[0] = v)?;
    }

    #[test]
    fn prop_clamping(factors in arb_complete_factors()) {
        let est = estimate(&factors);
        if est.raw > MAX_POINTS {
            prop_assert_eq!(est.points, MAX_POINTS);
            prop_assert!(est.capped);
        } else {
            prop_assert_eq!(est.points, est.raw);
            prop_assert!(!est.capped);
        }
    }

    #[test]
    fn prop_zero_effect_adjustments(base in 0u32..1_000_000) {
        prop_assert_eq!(finalize(base, 0.0, 1.0), base);
    }

    #[test]
    fn prop_buckets_are_step_functions(a in 0u32..500, b in 0u32..500) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(HoursBucket::for_points(lo).index() <= HoursBucket::for_points(hi).index());
        prop_assert!(TShirtSize::for_points(lo).index() <= TShirtSize::for_points(hi).index());
    }

    #[test]
    fn prop_level_count_mismatch_is_not_computable(
        factors in arb_complete_factors(),
        extra in 1usize..3,
    ) {
        let mut raw = EstimationFactors::from(&factors);
        raw.designer_levels.extend(std::iter::repeat(1.0).take(extra));
        prop_assert_eq!(compute_estimate(&raw), None);
    }

    #[test]
    fn prop_hints_never_negative(effort_idx in 0usize..6) {
        let effort = Effort::ALL[effort_idx];
        let hint = marginal_contribution(FactorChoice::Effort(effort), &CompleteFactors::neutral());
        let neutral = estimate(&CompleteFactors::neutral()).points;
        let mut with = CompleteFactors::neutral();
        with.effort = effort;
        prop_assert_eq!(hint, estimate(&with).points.saturating_sub(neutral));
    }
}

#[test]
fn ten_thousand_codes_stay_in_alphabet() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..10_000 {
        let code = generate_session_code_with(&mut rng);
        assert_eq!(code.as_str().len(), SESSION_CODE_LENGTH);
        assert!(code
            .as_str()
            .bytes()
            .all(|b| SESSION_CODE_ALPHABET.contains(&b)));
    }
}

#[test]
fn codes_cover_the_alphabet() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut seen = [false; 36];
    for _ in 0..2_000 {
        for b in generate_session_code_with(&mut rng).as_str().bytes() {
            if let Some(i) = SESSION_CODE_ALPHABET.iter().position(|&a| a == b) {
                seen[i] = true;
            }
        }
    }
    assert!(seen.iter().all(|&s| s));
}

#[test]
fn hours_label_for_neutral_baseline() {
    let points = estimate(&CompleteFactors::neutral()).points;
    assert_eq!(estimate_to_hours(points), "4-8 hours");
}
