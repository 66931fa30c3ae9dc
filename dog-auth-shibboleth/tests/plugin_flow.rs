use std::sync::Arc;

use dog_auth_shibboleth::{
    JsonMessage, ManageRequest, ShibbolethAuthPlugin, ShibbolethOptions, ENABLED_SETTING, PLUGIN_NAME,
};
use dog_core::{
    AdminScope, DispatchRequest, HandlerSelection, HookRegistry, MemorySettingsStore, SettingsStore,
    StaticTopology, TenantContext, TenantId,
};
use serde_json::json;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn multi_tenant() -> StaticTopology {
    StaticTopology::new([TenantId(5), TenantId(6)])
}

fn build(settings: &Arc<MemorySettingsStore>, tenants: &StaticTopology) -> ShibbolethAuthPlugin {
    ShibbolethAuthPlugin::new(settings.clone(), tenants, ShibbolethOptions::default())
        .expect("plugin should build")
}

#[test]
fn global_flag_wins_over_tenant_write() {
    init_tracing();
    let settings = Arc::new(MemorySettingsStore::new().with(TenantId::GLOBAL, ENABLED_SETTING, json!(true)));
    let plugin = build(&settings, &multi_tenant());
    assert!(plugin.topology().globally_enabled);

    let written = plugin
        .authorizer(AdminScope::Tenant(TenantId(5)))
        .set_enabled(false, TenantId(5))
        .unwrap();
    assert_eq!(written, TenantId(5));
    assert_eq!(settings.get(TenantId(5), ENABLED_SETTING).unwrap(), Some(json!(false)));
    assert_eq!(settings.get(TenantId::GLOBAL, ENABLED_SETTING).unwrap(), Some(json!(true)));

    let ctx = TenantContext::new(TenantId(5));
    assert!(plugin.get_enabled(&ctx, Some(TenantId(5))).unwrap());
    assert!(plugin.get_enabled(&ctx, None).unwrap());
}

#[test]
fn single_tenant_ignores_stale_tenant_copy() {
    init_tracing();
    let settings = Arc::new(
        MemorySettingsStore::new()
            .with(TenantId::GLOBAL, ENABLED_SETTING, json!(false))
            .with(TenantId(1), ENABLED_SETTING, json!(true)),
    );
    let plugin = build(&settings, &StaticTopology::single(TenantId(1)));

    assert!(!plugin.get_enabled(&TenantContext::new(TenantId(1)), None).unwrap());

    plugin
        .authorizer(AdminScope::Tenant(TenantId(1)))
        .set_enabled(true, TenantId(1))
        .unwrap();
    assert!(plugin.get_enabled(&TenantContext::new(TenantId(1)), None).unwrap());
}

#[test]
fn register_installs_hook_only_when_enabled() {
    init_tracing();
    let settings = Arc::new(MemorySettingsStore::new().with(TenantId(5), ENABLED_SETTING, json!(true)));
    let plugin = build(&settings, &multi_tenant());
    let hooks = HookRegistry::new();

    assert!(!plugin.register(&hooks, &TenantContext::new(TenantId(6))).unwrap());
    assert_eq!(hooks.load_handler_count(), 0);

    assert!(plugin.register(&hooks, &TenantContext::new(TenantId(5))).unwrap());
    assert_eq!(hooks.load_handler_count(), 1);

    let tenant5 = TenantContext::new(TenantId(5));
    let selection = hooks.load_handler(&tenant5, &DispatchRequest::new("login", "signIn"));
    assert_eq!(selection.handler_id(), Some("ShibbolethHandler"));
    assert_eq!(selection.plugin_name(), Some(PLUGIN_NAME));

    // The hook re-checks the toggle per request tenant.
    let tenant6 = TenantContext::new(TenantId(6));
    assert_eq!(
        hooks.load_handler(&tenant6, &DispatchRequest::new("login", "signIn")),
        HandlerSelection::Native
    );
    assert_eq!(
        hooks.load_handler(&tenant5, &DispatchRequest::new("article", "view")),
        HandlerSelection::Native
    );
}

#[test]
fn manage_settings_round() {
    init_tracing();
    let settings = Arc::new(MemorySettingsStore::new());
    let plugin = build(&settings, &multi_tenant());
    let scope = AdminScope::Tenant(TenantId(6));

    let fetched = plugin.manage("settings", &ManageRequest::default(), scope).unwrap();
    assert_eq!(
        fetched,
        JsonMessage::with_content(true, json!({"enabled": false, "canEnable": true, "canDisable": true}))
    );

    let saved = plugin
        .manage(
            "settings",
            &ManageRequest {
                save: true,
                input: json!({"enabled": true}),
            },
            scope,
        )
        .unwrap();
    assert_eq!(saved, JsonMessage::ok());
    assert!(settings.get_bool(TenantId(6), ENABLED_SETTING).unwrap());
    assert!(plugin.get_enabled(&TenantContext::new(TenantId(6)), None).unwrap());
}

#[test]
fn manage_refuses_enable_without_tenant() {
    init_tracing();
    let settings = Arc::new(MemorySettingsStore::new());
    let plugin = build(&settings, &multi_tenant());

    let reply = plugin
        .manage(
            "settings",
            &ManageRequest {
                save: true,
                input: json!({"enabled": true}),
            },
            AdminScope::Tenant(TenantId::GLOBAL),
        )
        .unwrap();
    assert!(!reply.status);
    assert_eq!(reply.content.unwrap()["errors"][0]["field"], "enabled");
    assert!(!settings.contains(TenantId::GLOBAL, ENABLED_SETTING).unwrap());

    let site = plugin
        .manage(
            "settings",
            &ManageRequest {
                save: true,
                input: json!({"enabled": true}),
            },
            AdminScope::Site,
        )
        .unwrap();
    assert!(site.status);
    assert!(settings.get_bool(TenantId::GLOBAL, ENABLED_SETTING).unwrap());
}
