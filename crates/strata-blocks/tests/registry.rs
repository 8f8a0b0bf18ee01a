use strata_blocks::{AIR, BlockRegistry, MAX_LIGHT};

#[test]
fn builtin_has_emissive_and_translucent_blocks() {
    let reg = BlockRegistry::builtin();
    let water = reg.id_by_name("water").expect("water");
    let glow = reg.id_by_name("glowstone").expect("glowstone");
    assert!(reg.is_translucent(water));
    assert!(!reg.is_opaque(water));
    assert!(reg.emission(glow) > 0 && reg.emission(glow) <= MAX_LIGHT);
    assert!(reg.is_opaque(reg.id_by_name("stone").unwrap()));
}

#[test]
fn ids_are_assigned_in_order_when_omitted() {
    let reg = BlockRegistry::from_toml_str(
        r#"
        [[blocks]]
        name = "rock"
        [[blocks]]
        name = "ice"
        translucent = true
        "#,
    )
    .expect("registry");
    assert_eq!(reg.id_by_name("rock"), Some(1));
    assert_eq!(reg.id_by_name("ice"), Some(2));
    assert_eq!(reg.get(AIR).name, "air");
}

#[test]
fn unknown_block_must_exist() {
    let res = BlockRegistry::from_toml_str(
        r#"
        unknown_block = "missing"
        [[blocks]]
        name = "rock"
        "#,
    );
    assert!(res.is_err());
}
