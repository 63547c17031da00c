// tests/interpretation.rs
use glam::Vec3;
use sprout_lsystem::{
    ErrorKind, GrammarConfig, LSystemError, LSystemInterpreter, PlantModel, ResolutionError, Rule,
    SyntaxError, parse,
};

fn assert_close(a: Vec3, b: Vec3) {
    assert!(a.abs_diff_eq(b, 1e-5), "{a:?} != {b:?}");
}

#[test]
fn test_single_draw_at_depth_zero() {
    let config = GrammarConfig::new("F").with_thickness(0.25);
    let geometry = parse(&config).unwrap();

    assert_eq!(geometry.len(), 1);
    let segment = geometry.segments[0];
    assert_eq!(segment.start, Vec3::ZERO);
    assert_close(segment.end, Vec3::new(0.0, 1.0, 0.0));
    assert_eq!(segment.width, 0.25);
}

#[test]
fn test_brackets_restore_state() {
    // F [ F ] F: the bracketed segment starts where the last one continues from.
    let geometry = parse(&GrammarConfig::new("F[+F]F")).unwrap();
    assert_eq!(geometry.len(), 3);

    let [trunk, branch, continuation] = geometry.segments[..] else {
        panic!("expected 3 segments, got {}", geometry.len());
    };
    assert_close(branch.start, trunk.end);
    assert_close(continuation.start, trunk.end);
    assert_close(continuation.end, Vec3::new(0.0, 2.0, 0.0));
    assert!(branch.direction().dot(Vec3::Y) < 0.99);

    assert_eq!(parse(&GrammarConfig::new("F[F]F")).unwrap().len(), 3);
}

#[test]
fn test_unmatched_bracket_fails_without_geometry() {
    let err = parse(&GrammarConfig::new("F]")).unwrap_err();
    assert_eq!(err, LSystemError::Syntax(SyntaxError::UnmatchedBracket { position: 1 }));
    assert_eq!(err.kind(), ErrorKind::Syntax);
}

#[test]
fn test_unmatched_bracket_inside_expansion() {
    let config = GrammarConfig::new("FA")
        .with_rule(Rule::new("A", "F]"))
        .with_max_depth(1);
    let err = parse(&config).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Syntax);

    // Below the depth limit the faulty replacement is never walked.
    assert_eq!(parse(&config.clone().with_max_depth(0)).unwrap().len(), 1);
}

#[test]
fn test_parameter_overrides_default_angle() {
    let config = GrammarConfig::new("F+(90)F").with_angle(20.0);
    let geometry = parse(&config).unwrap();
    assert_eq!(geometry.len(), 2);

    let first = geometry.segments[0].direction();
    let second = geometry.segments[1].direction();
    assert!(first.dot(second).abs() < 1e-5);
    assert_close(second, Vec3::NEG_X);

    // Without the override the default 20 degrees apply.
    let geometry = parse(&GrammarConfig::new("F+F").with_angle(20.0)).unwrap();
    let cos = geometry.segments[0].direction().dot(geometry.segments[1].direction());
    assert!((cos - 20.0f32.to_radians().cos()).abs() < 1e-5);
}

#[test]
fn test_parameter_from_constant() {
    let config = GrammarConfig::new("F-(quarter)F").with_constant("quarter", 90.0);
    let geometry = parse(&config).unwrap();
    assert_close(geometry.segments[1].direction(), Vec3::X);
}

#[test]
fn test_unknown_constant() {
    let err = parse(&GrammarConfig::new("F+(radius)F")).unwrap_err();
    assert_eq!(
        err,
        LSystemError::Resolution(ResolutionError::UnknownConstant {
            name: "radius".into()
        })
    );
    assert_eq!(err.to_string(), "resolution error: unknown constant radius");
}

#[test]
fn test_unterminated_parameter() {
    let err = parse(&GrammarConfig::new("F&(45F")).unwrap_err();
    assert_eq!(
        err,
        LSystemError::Syntax(SyntaxError::UnterminatedParameter { position: 2 })
    );
}

#[test]
fn test_thickness_commands() {
    let config = GrammarConfig::new("F>F<<F>(0.5)F")
        .with_thickness(1.0)
        .with_thickness_factor(2.0);
    let widths: Vec<f32> = parse(&config).unwrap().iter().map(|s| s.width).collect();
    assert_eq!(widths, vec![1.0, 2.0, 0.5, 0.25]);
}

#[test]
fn test_turn_around_and_pitch() {
    let geometry = parse(&GrammarConfig::new("F|F&(90)F")).unwrap();
    assert_close(geometry.segments[1].end, Vec3::ZERO);
    assert_close(geometry.segments[2].direction(), Vec3::Z);
}

#[test]
fn test_opposite_commands_turn_opposite_ways() {
    let direction = |axiom: &str| {
        let geometry = parse(&GrammarConfig::new(axiom)).unwrap();
        geometry.segments[0].direction()
    };

    // Pitch around left.
    assert_close(direction("&(90)F"), Vec3::NEG_Z);
    assert_close(direction("^(90)F"), Vec3::Z);

    // Roll around the heading, made visible by a following pitch.
    assert_close(direction("/(90)&(90)F"), Vec3::NEG_X);
    assert_close(direction("\\(90)&(90)F"), Vec3::X);

    // Yaw around up.
    assert_close(direction("+(90)F"), Vec3::NEG_X);
    assert_close(direction("-(90)F"), Vec3::X);
}

#[test]
fn test_thickness_parameter_from_constant() {
    let config = GrammarConfig::new("F<(k)F>(k)>(k)F")
        .with_thickness(1.0)
        .with_constant("k", 4.0);
    let widths: Vec<f32> = parse(&config).unwrap().iter().map(|s| s.width).collect();
    assert_eq!(widths, vec![1.0, 0.25, 4.0]);
}

#[test]
fn test_zero_thickness_divisor() {
    let err = parse(&GrammarConfig::new("F<(0)F")).unwrap_err();
    assert_eq!(err, LSystemError::Syntax(SyntaxError::ZeroDivisor { position: 1 }));

    let config = GrammarConfig::new("F<(zero)F").with_constant("zero", 0.0);
    assert_eq!(parse(&config).unwrap_err().kind(), ErrorKind::Syntax);

    let config = GrammarConfig::new("F<F").with_thickness_factor(0.0);
    assert_eq!(parse(&config).unwrap_err().kind(), ErrorKind::Grammar);
}

#[test]
fn test_overflowing_angle_literal() {
    let err = parse(&GrammarConfig::new("+(1e40)F")).unwrap_err();
    assert_eq!(
        err,
        LSystemError::Syntax(SyntaxError::InvalidNumber {
            position: 2,
            text: "1e40".into()
        })
    );
}

#[test]
fn test_deep_linear_recursion() {
    let config = GrammarConfig::new("A")
        .with_rule(Rule::new("A", "FA"))
        .with_max_depth(100_000);
    let geometry = parse(&config).unwrap();

    assert_eq!(geometry.len(), 100_000);
    let last = geometry.segments[99_999];
    assert_eq!(last.end.y, 100_000.0);
}

#[test]
fn test_error_deep_inside_expansion_aborts() {
    // The innermost copy of `A` is walked last; the trailing `]` after it still fails.
    let config = GrammarConfig::new("A]")
        .with_rule(Rule::new("A", "FA"))
        .with_max_depth(50_000);
    let err = parse(&config).unwrap_err();
    assert_eq!(err, LSystemError::Syntax(SyntaxError::UnmatchedBracket { position: 1 }));
}

#[test]
fn test_segment_count_grows_with_depth() {
    let base = GrammarConfig::new("A").with_rule(Rule::new("A", "F[+A]F A"));
    let counts: Vec<usize> = (0..6)
        .map(|d| parse(&base.clone().with_max_depth(d)).unwrap().len())
        .collect();

    assert_eq!(counts[0], 0);
    for pair in counts.windows(2) {
        assert!(pair[1] > pair[0], "{counts:?}");
    }
    // 2 segments per expansion, 2^d - 1 expansions.
    assert_eq!(counts[5], 2 * 31);
}

#[test]
fn test_self_referential_rule_terminates() {
    let config = GrammarConfig::new("A")
        .with_rule(Rule::new("A", "A"))
        .with_max_depth(64);
    assert!(parse(&config).unwrap().is_empty());
}

#[test]
fn test_alphabetic_draw_symbol_still_draws_at_max_depth() {
    let config = GrammarConfig::new("F")
        .with_rule(Rule::new("F", "FF"))
        .with_max_depth(2);
    // 1 + 2 + 4
    assert_eq!(parse(&config).unwrap().len(), 7);
}

#[test]
fn test_grammar_errors_abort() {
    let config = GrammarConfig::new("F").with_rule(Rule::new("", "F"));
    assert_eq!(parse(&config).unwrap_err().kind(), ErrorKind::Grammar);

    let config = GrammarConfig::new("F").with_rule(Rule::weighted("A", 0.4, "F"));
    assert_eq!(parse(&config).unwrap_err().kind(), ErrorKind::Grammar);
}

#[test]
fn test_interpreter_runs_are_independent() {
    let config = GrammarConfig::new("A")
        .with_rule(Rule::weighted("A", 0.5, "F+A"))
        .with_rule(Rule::weighted("A", 0.5, "F-A"))
        .with_max_depth(12);
    let interpreter = LSystemInterpreter::compile(&config).unwrap();
    assert_eq!(interpreter.symbols().len(), 1);
    assert_eq!(interpreter.run().unwrap(), interpreter.run().unwrap());
}

#[test]
fn test_plant_model_keeps_last_good_geometry() {
    let mut model = PlantModel::new();
    assert!(model.geometry().is_empty());

    let good = GrammarConfig::new("FF");
    assert_eq!(model.reparse(&good).unwrap().len(), 2);

    assert!(model.reparse(&GrammarConfig::new("F]")).is_err());
    assert_eq!(model.geometry().len(), 2);
}

#[test]
fn test_config_from_json_fills_defaults() {
    let config: GrammarConfig = serde_json::from_str(
        r#"{
            "axiom": "A",
            "constants": [["spread", 30.0]],
            "rules": [{ "symbol": "A", "replacement": "F[&(spread)A]" }],
            "max_depth": 2
        }"#,
    )
    .unwrap();

    assert_eq!(config.rules[0].weight, 1.0);
    assert_eq!(config.default_angle, 20.0);
    assert_eq!(config.default_thickness, 0.05);
    assert_eq!(config.seed, 15312);
    assert_eq!(parse(&config).unwrap().len(), 2);
}
