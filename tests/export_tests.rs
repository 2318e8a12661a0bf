use std::path::PathBuf;

use mountforge::data::{load_catalog, Catalog};
use mountforge::export::{
    export_configuration, export_document, parse_document, to_json, ActionSection, CharacterSheet, SCHEMA,
};
use mountforge::loadout::{derive, EncumbranceTier, LoadoutConfiguration, LoadoutSession, MountSelection};

fn catalog() -> Catalog {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data");
    load_catalog(dir).expect("sample catalog should load")
}

fn wyvern_config() -> LoadoutConfiguration {
    let mut config = LoadoutConfiguration::for_base("white_wyvern");
    config.saddle_id = Some("wyvern_howdah".to_string());
    config
        .mount_selections
        .insert("turret".to_string(), MountSelection::weapon("harpoon_launcher", 2));
    config
        .mount_selections
        .insert("tail".to_string(), MountSelection::weapon("scythe_blades", 1));
    config
}

#[test]
fn export_carries_derived_values() {
    let catalog = catalog();
    let mut session = LoadoutSession::new(&catalog, "griffon").unwrap();
    assert!(session.add_mod("wind_vanes").is_applied());
    assert!(session.add_mod("reinforced_plating").is_applied());
    assert!(session.set_mount_weapon("left", Some("repeating_crossbow")).is_applied());
    assert!(session.set_crew_dex("gunner", 2).is_applied());

    let doc = session.export();
    assert_eq!(doc.schema, SCHEMA);
    assert_eq!(doc.base_id, "griffon");
    assert_eq!(doc.saddle_id.as_deref(), Some("griffon_war_saddle"));
    assert_eq!(doc.mod_ids, vec!["wind_vanes", "reinforced_plating"]);
    assert_eq!(doc.mods[0].name, "Wind Vanes");
    assert_eq!(doc.stats.ac, 15);
    assert_eq!(doc.stats.agility, 6);
    assert_eq!(doc.movement.mode, "fly");
    assert_eq!(doc.movement.mode("fly"), Some((70, 110)));
    assert_eq!(doc.movement.mode("ground"), Some((30, 40)));
    assert_eq!(doc.encumbrance.carried_weight, 50.0);
    assert_eq!(doc.encumbrance.state, EncumbranceTier::Normal);

    let trait_names: Vec<&str> = doc.traits.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(trait_names, vec!["Keen Sight", "Flyby", "Windborne"]);

    assert_eq!(doc.mounted_weapons.len(), 1);
    let mw = &doc.mounted_weapons[0];
    assert_eq!(mw.mount_id, "left");
    assert_eq!(mw.crew_group, "gunner");
    assert_eq!(mw.attack_bonus, 2);
    assert_eq!(mw.range.as_deref(), Some("100/400 ft."));
    assert!(mw.reach.is_none());
    assert_eq!(mw.traits[0].name, "Repeating");
    assert_eq!(doc.crew_stats["gunner"].dex_mod, 2);
}

#[test]
fn heavy_load_shows_in_exported_primary_max() {
    let catalog = catalog();
    let mut config = wyvern_config();
    config
        .mount_selections
        .insert("turret".to_string(), MountSelection::weapon("bomb_rack", 1));
    let derivation = derive(&catalog, &config).unwrap();
    // 120 howdah + 200 bombs + 60 blades against 20 x 15 x 4 = 1200
    assert_eq!(derivation.encumbrance.payload, 380.0);
    assert_eq!(derivation.encumbrance.tier, EncumbranceTier::Normal);

    let mut derivation = derive(&catalog, &wyvern_config()).unwrap();
    derivation.encumbrance.tier = EncumbranceTier::HeavilyEncumbered;
    derivation.encumbrance.max_speed = 100;
    let doc = export_document(&derivation, &catalog);
    assert_eq!(doc.movement.max, 100);
    assert_eq!(doc.movement.mode("fly"), Some((80, 100)));
    assert_eq!(doc.movement.mode("ground"), Some((20, 20)));
}

#[test]
fn illegal_mounted_weapon_is_omitted_from_export() {
    let catalog = catalog();
    let mut derivation = derive(&catalog, &wyvern_config()).unwrap();
    assert_eq!(derivation.mounted_weapons.len(), 2);

    let turret = derivation
        .slots
        .iter_mut()
        .find(|slot| slot.point.id == "turret")
        .unwrap();
    turret.point.weapon_allowlist = Some(vec!["heavy_ballista".to_string()]);

    let doc = export_document(&derivation, &catalog);
    let ids: Vec<&str> = doc.mounted_weapons.iter().map(|mw| mw.mount_id.as_str()).collect();
    assert_eq!(ids, vec!["tail"]);
    assert_eq!(doc.mounted_weapons[0].reach.as_deref(), Some("5 ft"));
    assert_eq!(doc.mounted_weapons[0].attack_bonus, 5);
}

#[test]
fn document_round_trips_through_text_and_back_into_a_configuration() {
    let catalog = catalog();
    let doc = export_configuration(&catalog, &wyvern_config()).unwrap();
    let text = to_json(&doc).unwrap();

    let parsed = parse_document(&text).unwrap();
    assert_eq!(parsed, doc);

    let config = parsed.to_configuration();
    let derivation = derive(&catalog, &config).unwrap();
    assert_eq!(derivation.configuration.mount_selections["turret"], MountSelection::weapon("harpoon_launcher", 2));
    assert_eq!(export_document(&derivation, &catalog), doc);
}

#[test]
fn pasted_handout_text_still_parses() {
    let catalog = catalog();
    let doc = export_configuration(&catalog, &wyvern_config()).unwrap();
    let json = to_json(&doc).unwrap();
    let escaped = json
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace("\n", "<br>");
    let handout = format!("<p>Loadout for the party:</p><pre>{escaped}</pre>");
    assert_eq!(parse_document(&handout).unwrap(), doc);
}

#[test]
fn sheet_rebuilds_everything_from_the_document() {
    let catalog = catalog();
    let mut session = LoadoutSession::from_configuration(&catalog, &wyvern_config()).unwrap();
    assert!(session.set_crew_dex("crew", 3).is_applied());
    assert!(session.set_crew_prof_bonus("crew", 2).is_applied());
    assert!(session.set_proficiency("turret", true).is_applied());
    let doc = session.export();

    let sheet = CharacterSheet::from_document(&doc);
    assert_eq!(sheet.name, "White Wyvern");
    assert_eq!(sheet.armor_class, 14);
    assert_eq!(sheet.abilities[0].modifier, 5);
    assert_eq!(sheet.speed, "fly 80 ft. (max 120 ft.); ground 20 ft.");

    let traits: Vec<&str> = sheet.traits.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        traits,
        vec!["Keen Sight", "Cold Resistance", "Agility", "Crew"]
    );
    assert_eq!(sheet.traits[3].desc, "crew: DEX +3, PB +2");

    let names: Vec<&str> = sheet.actions.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Stinger",
            "Frost Breath",
            "Wing Sweep",
            "Mounted: Harpoon Launcher",
            "Mounted: Scythe Blades",
        ]
    );
    assert_eq!(sheet.actions[2].section, ActionSection::Legendary);
    assert!(sheet.actions[1].attack.is_none());

    let harpoon = &sheet.actions[3];
    let roll = harpoon.attack.as_ref().unwrap();
    assert_eq!(roll.bonus, 5);
    assert_eq!(roll.range_text, "Range 60/240 ft.");
    assert_eq!(
        harpoon.description,
        "Harpoon Launcher ×2 (360). Ranged Weapon Attack: +5 to hit. Range: 60/240 ft. Hit: 2d6 piercing. Traits: Tethered."
    );
    assert!(harpoon.command.starts_with("&{template:npcaction} {{name=Mounted: Harpoon Launcher}}"));

    let blades = &sheet.actions[4];
    assert_eq!(blades.attack.as_ref().unwrap().range_text, "Reach 5 ft");
    assert_eq!(blades.attack.as_ref().unwrap().bonus, 5);
}

#[test]
fn vehicle_sheet_gets_movement_traits_and_acceleration_action() {
    let catalog = catalog();
    let mut config = LoadoutConfiguration::for_base("sky_skiff");
    config.mod_ids.push("armored_hull".to_string());
    let doc = export_configuration(&catalog, &config).unwrap();
    let sheet = CharacterSheet::from_document(&doc);

    let traits: Vec<&str> = sheet.traits.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        traits,
        vec!["Hover", "Acceleration", "Climb Rate", "Agility", "Crew", "Mod: Armored Hull"]
    );
    assert_eq!(sheet.traits[1].desc, "1d4 x 10 ft.");
    assert_eq!(sheet.traits[4].desc, "gunners: DEX +0, PB +0\npilot: DEX +0, PB +0");

    let accel = sheet.actions.iter().find(|a| a.name == "Acceleration").unwrap();
    assert_eq!(accel.description, "Acceleration: [[1d4 x 10 ft.]]");
    assert!(sheet.actions.iter().any(|a| a.name == "Evasive Roll" && a.section == ActionSection::Reaction));
}

#[test]
fn export_lists_only_the_crew_the_loadout_has_now() {
    let catalog = catalog();
    let mut session = LoadoutSession::new(&catalog, "griffon").unwrap();
    assert!(session.set_crew_dex("gunner", 2).is_applied());
    assert!(session.select_saddle(Some("riding_saddle")).is_applied());
    assert!(session.set_mount_weapon("left_flank", Some("light_crossbow")).is_applied());
    assert_eq!(session.configuration().crew("gunner").dex_mod, 2);

    let doc = session.export();
    let groups: Vec<&str> = doc.crew_stats.keys().map(String::as_str).collect();
    assert_eq!(groups, vec!["operator"]);

    let sheet = CharacterSheet::from_document(&doc);
    let crew = sheet.traits.iter().find(|t| t.name == "Crew").unwrap();
    assert_eq!(crew.desc, "operator: DEX +0, PB +0");
}
