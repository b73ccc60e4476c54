use idle_arena_core::{
    CharacterBlueprint, CharacterSnapshot, EquipmentLoadout, Position, ProfileLookup,
    SkillLoadout,
};

/// Resolves a persisted character against the catalog.
///
/// Gems and items without a matching catalog row are dropped, as are items
/// that cannot be worn.
pub(crate) fn character_blueprint(
    snapshot: &CharacterSnapshot,
    catalog: &dyn ProfileLookup,
    move_speed: f64,
    position: Position,
) -> CharacterBlueprint {
    let skills = snapshot
        .skills
        .iter()
        .filter_map(|gem| {
            let Some(profile) = catalog.skill_profile(gem.skill) else {
                log::debug!("skipping skill {} missing from the catalog", gem.skill);
                return None;
            };
            Some(SkillLoadout {
                id: gem.id,
                skill: gem.skill,
                level: gem.level,
                base_damage: profile.base_damage,
                mana_cost: profile.mana_cost,
                cooldown_ticks: profile.cooldown_ticks,
                range: profile.range,
                damage_type: profile.damage_type,
                area_radius: profile.area_radius,
                linked_supports: gem.linked_supports.clone(),
            })
        })
        .collect();

    let equipment = snapshot
        .equipment
        .iter()
        .filter_map(|item| {
            let Some(profile) = catalog
                .equipment_profile(item.item)
                .filter(|profile| profile.is_equipment())
            else {
                log::debug!("skipping item {:?} that cannot be worn", item.item);
                return None;
            };
            Some(EquipmentLoadout {
                id: item.id,
                item: item.item,
                category: profile.category,
                slot: item.equipped_slot.or(profile.slot),
                item_level: item.item_level,
                attributes: item.attributes.clone(),
            })
        })
        .collect();

    CharacterBlueprint {
        id: snapshot.id,
        name: snapshot.name.clone(),
        level: snapshot.level,
        experience: snapshot.experience,
        strength: snapshot.strength,
        dexterity: snapshot.dexterity,
        intelligence: snapshot.intelligence,
        vitality: snapshot.vitality,
        skills,
        equipment,
        move_speed,
        position,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use idle_arena_catalog::ProfileRegistry;
    use idle_arena_core::{
        Attribute, CharacterSnapshot, EquipmentSlot, ItemKey, ItemSnapshot, Position, SkillKey,
        SkillSnapshot,
    };
    use uuid::Uuid;

    use super::character_blueprint;

    #[test]
    fn unknown_gems_are_skipped_and_known_ones_resolved() {
        let catalog = ProfileRegistry::builder()
            .with_skill(
                ProfileRegistry::builtin()
                    .expect("builtin catalog")
                    .to_document()
                    .skills
                    .into_iter()
                    .find(|profile| profile.key == SkillKey::Fireball)
                    .expect("fireball registered"),
            )
            .build()
            .expect("catalog");

        let snapshot = CharacterSnapshot {
            id: Uuid::from_u128(1),
            name: "Hero".to_owned(),
            level: 4,
            experience: 0,
            strength: 2,
            dexterity: 2,
            intelligence: 2,
            vitality: 2,
            skills: vec![
                SkillSnapshot {
                    id: Uuid::from_u128(2),
                    skill: SkillKey::BasicAttack,
                    level: 1,
                    linked_supports: Vec::new(),
                },
                SkillSnapshot {
                    id: Uuid::from_u128(3),
                    skill: SkillKey::Fireball,
                    level: 2,
                    linked_supports: Vec::new(),
                },
            ],
            equipment: vec![ItemSnapshot {
                id: Uuid::from_u128(4),
                item: ItemKey::Helmet,
                item_level: 1,
                equipped_slot: Some(EquipmentSlot::Head),
                attributes: BTreeMap::from([(Attribute::Armor, 5)]),
            }],
        };

        let blueprint = character_blueprint(&snapshot, &catalog, 0.1, Position::new(2.0, 2.0));

        assert_eq!(blueprint.skills.len(), 1);
        let fireball = &blueprint.skills[0];
        assert_eq!(fireball.skill, SkillKey::Fireball);
        assert_eq!(fireball.id, Uuid::from_u128(3));
        assert_eq!(fireball.level, 2);
        assert_eq!(fireball.base_damage, 25);
        assert_eq!(fireball.mana_cost, 15);
        assert_eq!(fireball.area_radius, Some(2.0));
        assert!(blueprint.equipment.is_empty());
    }
}
