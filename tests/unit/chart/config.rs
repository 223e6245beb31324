use super::*;

#[test]
fn ramp_endpoints_are_exact() {
    let ramp = ChartConfig::heatmap().ramp;
    assert_eq!(ramp.for_score(0), ramp.cool);
    assert_eq!(ramp.for_score(100), ramp.hot);
    assert_eq!(ramp.sample(-1.0), ramp.cool);
    assert_eq!(ramp.sample(f64::NAN), ramp.cool);
}

#[test]
fn linear_ramp_is_monotone_per_channel() {
    let ramp = ColorRamp {
        cool: Rgba8::opaque(0, 255, 220),
        hot: Rgba8::opaque(255, 80, 120),
        space: RampSpace::LinearRgb,
    };
    let mut prev = ramp.for_score(0);
    for s in 1..=100u8 {
        let c = ramp.for_score(s);
        assert!(c.r >= prev.r);
        assert!(c.g <= prev.g);
        assert!(c.b <= prev.b);
        prev = c;
    }
    assert_eq!(ramp.sample(0.5), Rgba8::opaque(128, 168, 170));
}

#[test]
fn hsl_ramp_takes_short_hue_arc() {
    let ramp = ColorRamp {
        cool: Rgba8::opaque(255, 0, 0),
        hot: Rgba8::opaque(0, 0, 255),
        space: RampSpace::Hsl,
    };
    // red (0 deg) to blue (240 deg) goes backwards through magenta.
    let mid = ramp.sample(0.5);
    assert_eq!(mid, Rgba8::opaque(255, 0, 255));
    assert_eq!(ramp.sample(1.0), Rgba8::opaque(0, 0, 255));
}

#[test]
fn defaults_differ_per_chart() {
    let radar = ChartConfig::radar();
    let heat = ChartConfig::heatmap();
    assert_eq!(radar.frame_interval_ms(), None);
    assert!((heat.frame_interval_ms().unwrap() - 83.333).abs() < 1e-2);
    assert_eq!(radar.max_device_pixel_ratio, 2.0);
    assert_eq!(heat.max_device_pixel_ratio, 3.0);
    assert_eq!(radar.pad_score, 80);
    assert_eq!(heat.pad_score, 0);
    assert_eq!(heat.silhouette, Silhouette::Outline);
}

#[test]
fn zero_or_negative_cap_means_unthrottled() {
    let mut c = ChartConfig::heatmap();
    c.frame_rate_cap = Some(0.0);
    assert_eq!(c.frame_interval_ms(), None);
    c.frame_rate_cap = Some(-3.0);
    assert_eq!(c.frame_interval_ms(), None);
}

#[test]
fn max_dpr_env_parsing() {
    assert_eq!(parse_max_dpr(" 1.5 "), Some(1.5));
    assert_eq!(parse_max_dpr("0"), None);
    assert_eq!(parse_max_dpr("-2"), None);
    assert_eq!(parse_max_dpr("inf"), None);
    assert_eq!(parse_max_dpr("two"), None);
}

#[test]
fn overrides_merge_onto_defaults() {
    let o: ChartOverrides = serde_json::from_value(serde_json::json!({
        "frame_rate_cap": null,
        "glow_scale": 1.5,
        "accent": "#ff000080",
        "ramp": { "cool": [0.0, 0.0, 1.0], "hot": "#ff0000", "space": "hsl" },
        "silhouette": { "image": "body.svg" }
    }))
    .unwrap();
    let c = ChartConfig::heatmap().merged(o);
    assert_eq!(c.frame_rate_cap, None);
    assert_eq!(c.glow_scale, 1.5);
    assert_eq!(c.accent, Rgba8::new(255, 0, 0, 128));
    assert_eq!(c.ramp.cool, Rgba8::opaque(0, 0, 255));
    assert_eq!(c.ramp.space, RampSpace::Hsl);
    assert_eq!(c.silhouette, Silhouette::Image(PathBuf::from("body.svg")));
    assert_eq!(c.pad_score, 0);
}

#[test]
fn absent_frame_rate_cap_keeps_default() {
    let o: ChartOverrides = serde_json::from_str("{}").unwrap();
    assert_eq!(o.frame_rate_cap, None);
    let c = ChartConfig::heatmap().merged(o);
    assert_eq!(c.frame_rate_cap, Some(12.0));
}

#[test]
fn unknown_override_keys_are_rejected() {
    let r: Result<ChartOverrides, _> = serde_json::from_str(r#"{"fps": 30}"#);
    assert!(r.is_err());
}
