use std::time::Duration;

use super::{CacheOptions, EffectiveOptions, TieredConfig};

#[test]
fn test_resolve_all_defaults() {
    let resolved = EffectiveOptions::resolve(&CacheOptions::default(), &TieredConfig::default());

    assert!(resolved.use_local);
    assert!(resolved.use_remote);
    assert!(!resolved.set_local);
    assert!(!resolved.disabled);
    assert_eq!(resolved.ttl, None);
}

#[test]
fn test_resolve_call_overrides_defaults() {
    let call = CacheOptions::remote_only();
    let resolved = EffectiveOptions::resolve(&call, &TieredConfig::default());

    assert!(!resolved.use_local);
    assert!(resolved.use_remote);
}

#[test]
fn test_resolve_unset_flags_fall_back_to_defaults() {
    let call = CacheOptions::new().set_local(true);
    let defaults = TieredConfig::local_only();
    let resolved = EffectiveOptions::resolve(&call, &defaults);

    assert!(resolved.use_local);
    assert!(!resolved.use_remote);
    assert!(resolved.set_local);
}

#[test]
fn test_resolve_disabled_from_defaults() {
    let resolved = EffectiveOptions::resolve(&CacheOptions::default(), &TieredConfig::disabled());
    assert!(resolved.disabled);
}

#[test]
fn test_resolve_disabled_from_call() {
    let call = CacheOptions::new().disabled(true);
    let resolved = EffectiveOptions::resolve(&call, &TieredConfig::default());
    assert!(resolved.disabled);
}

#[test]
fn test_resolve_call_cannot_re_enable_disabled_instance() {
    let call = CacheOptions::new().disabled(false);
    let resolved = EffectiveOptions::resolve(&call, &TieredConfig::disabled());
    assert!(resolved.disabled);
}

#[test]
fn test_ttl_shorthand() {
    let call = CacheOptions::ttl(Duration::from_secs(1));
    let resolved = EffectiveOptions::resolve(&call, &TieredConfig::default());

    assert_eq!(resolved.ttl, Some(Duration::from_secs(1)));
    assert!(resolved.use_local);
    assert!(resolved.use_remote);
}

#[test]
fn test_ttl_absent_means_backend_default() {
    let resolved = EffectiveOptions::resolve(&CacheOptions::default(), &TieredConfig::default());
    assert_eq!(resolved.ttl, None);
}

#[test]
fn test_no_tier_enabled() {
    let resolved = EffectiveOptions::resolve(&CacheOptions::neither(), &TieredConfig::default());
    assert!(resolved.no_tier_enabled());

    let resolved =
        EffectiveOptions::resolve(&CacheOptions::default(), &TieredConfig::neither());
    assert!(resolved.no_tier_enabled());

    let resolved =
        EffectiveOptions::resolve(&CacheOptions::local_only(), &TieredConfig::neither());
    assert!(!resolved.no_tier_enabled());
}

#[test]
fn test_options_builders() {
    let opts = CacheOptions::new()
        .use_local(false)
        .use_remote(true)
        .with_ttl(Duration::from_millis(250));

    assert_eq!(opts.use_local, Some(false));
    assert_eq!(opts.use_remote, Some(true));
    assert_eq!(opts.ttl, Some(Duration::from_millis(250)));
    assert_eq!(opts.set_local, None);
    assert_eq!(opts.disabled, None);
}

#[test]
fn test_option_presets() {
    assert_eq!(CacheOptions::local_only().use_local, Some(true));
    assert_eq!(CacheOptions::local_only().use_remote, Some(false));
    assert_eq!(CacheOptions::remote_only().use_local, Some(false));
    assert_eq!(CacheOptions::neither().use_remote, Some(false));
}
