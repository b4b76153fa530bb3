use super::support::knowledge_fixture::{KnowledgeFixture, ROLES_TABLE};
use anyhow::Result;
use ppcbuilder::knowledge::{
    load_sources_from_dir, ColumnFamily, KnowledgeBase, KnowledgeStore, RoleId, TabularSource,
};
use std::sync::Arc;

#[test]
fn directory_load_reports_missing_role_tables() -> Result<()> {
    let fixture = KnowledgeFixture::new();
    let config = fixture.harness.config();
    let loaded = load_sources_from_dir(&fixture.harness.sources_dir(), &config.knowledge)?;

    assert_eq!(loaded.sources.len(), 2);
    assert_eq!(
        loaded.sources[1].role.as_deref(),
        Some("VP Customer Support")
    );
    let mut missing = loaded.missing_roles();
    missing.sort_unstable();
    assert_eq!(missing, vec!["IT Director", "Support Manager"]);
    Ok(())
}

#[test]
fn per_role_tables_merge_into_the_aggregate_row() -> Result<()> {
    let fixture = KnowledgeFixture::new();
    let config = fixture.harness.config();
    let loaded = load_sources_from_dir(&fixture.harness.sources_dir(), &config.knowledge)?;
    let knowledge = KnowledgeBase::load(&loaded.sources, &config.knowledge.product_category)?;

    let vp = knowledge
        .profile(&RoleId::Named("VP Customer Support".into()))
        .expect("vp profile");
    assert_eq!(
        vp.pain_points,
        vec!["Long response times", "Poor visibility", "Escalation chaos"]
    );
    assert_eq!(vp.business_outcomes, vec!["Lower churn"]);
    assert_eq!(
        knowledge.roles(),
        vec!["IT Director", "Support Manager", "VP Customer Support"]
    );
    Ok(())
}

#[test]
fn loading_is_deterministic() -> Result<()> {
    let first = KnowledgeBase::load(
        &[TabularSource::from_csv_str("roles", ROLES_TABLE)?],
        "Help Desk",
    )?;
    let second = KnowledgeBase::load(
        &[TabularSource::from_csv_str("roles", ROLES_TABLE)?],
        "Help Desk",
    )?;
    assert_eq!(first, second);
    assert_eq!(first.fingerprint(), second.fingerprint());
    Ok(())
}

#[test]
fn general_aggregate_contains_every_role_entry() -> Result<()> {
    let fixture = KnowledgeFixture::new();
    let knowledge = fixture.knowledge()?;
    let general = knowledge.general();

    for role in knowledge.roles() {
        let profile = knowledge
            .profile(&RoleId::Named(role.to_string()))
            .expect("listed role resolves");
        for family in ColumnFamily::ALL {
            for entry in profile.field(family) {
                assert!(
                    general.field(family).contains(entry),
                    "{entry} missing from general {}",
                    family.as_str()
                );
            }
        }
    }
    let mut sorted = general.pain_points.clone();
    sorted.sort();
    assert_eq!(general.pain_points, sorted);
    Ok(())
}

#[test]
fn rows_outside_the_product_category_are_ignored() -> Result<()> {
    let fixture = KnowledgeFixture::new();
    let knowledge = fixture.knowledge()?;
    assert!(knowledge
        .profile(&RoleId::Named("Sales Director".into()))
        .is_none());
    assert!(!knowledge
        .general()
        .pain_points
        .contains(&"Pipeline leaks".to_string()));
    Ok(())
}

#[test]
fn store_recomputes_after_sources_change() -> Result<()> {
    let fixture = KnowledgeFixture::new();
    let config = fixture.harness.config();
    let dir = fixture.harness.sources_dir();
    let store = KnowledgeStore::new(config.knowledge.product_category.clone());

    let before = store.load(&load_sources_from_dir(&dir, &config.knowledge)?.sources)?;
    let again = store.load(&load_sources_from_dir(&dir, &config.knowledge)?.sources)?;
    assert!(Arc::ptr_eq(&before, &again));

    fixture.harness.write_table(
        "support_manager.csv",
        "Pain_Point_1,Value_Prop_1\nShift handover gaps,Shared context\n",
    );
    let after = store.load(&load_sources_from_dir(&dir, &config.knowledge)?.sources)?;
    assert_ne!(before.fingerprint(), after.fingerprint());
    let manager = after
        .profile(&RoleId::Named("Support Manager".into()))
        .expect("manager profile");
    assert!(manager
        .pain_points
        .contains(&"Shift handover gaps".to_string()));
    Ok(())
}
