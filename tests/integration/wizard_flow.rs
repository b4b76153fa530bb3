use super::support::knowledge_fixture::KnowledgeFixture;
use anyhow::Result;
use ppcbuilder::knowledge::RoleId;
use ppcbuilder::wizard::stages::{
    AD_GROUP_COUNT, AUDIENCE, CAMPAIGN_GOALS, SUMMARY, TARGET_ROLE, WELCOME,
};
use ppcbuilder::wizard::{BuildBrief, BuildMode, StageGraph, WizardEngine, WizardError};

#[test]
fn retreat_keeps_answers_and_allows_re_advancing() -> Result<()> {
    let fixture = KnowledgeFixture::new();
    let knowledge = fixture.knowledge()?;
    let engine = WizardEngine::default();

    let session = engine.start();
    assert_eq!(session.current(), WELCOME);

    let session = engine.advance(&session, "Full Campaign", &knowledge)?;
    assert_eq!(session.current(), TARGET_ROLE);

    let session = engine.retreat(&session)?;
    assert_eq!(session.current(), WELCOME);
    assert_eq!(session.response(WELCOME), Some("Full Campaign"));
    let prompt = engine.present(&session, &knowledge)?;
    assert_eq!(prompt.prefill.as_deref(), Some("Full Campaign"));

    let session = engine.advance(&session, "Full Campaign", &knowledge)?;
    assert_eq!(session.current(), TARGET_ROLE);
    Ok(())
}

#[test]
fn rejected_answers_leave_the_session_untouched() -> Result<()> {
    let fixture = KnowledgeFixture::new();
    let knowledge = fixture.knowledge()?;
    let engine = WizardEngine::default();
    let session = engine.advance(&engine.start(), "Ads Only", &knowledge)?;
    let before = session.clone();

    let err = engine
        .advance(&session, "Chief Happiness Officer", &knowledge)
        .unwrap_err();
    match err {
        WizardError::InvalidResponse { stage, allowed, .. } => {
            assert_eq!(stage, TARGET_ROLE);
            assert!(allowed.contains(&"General".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(session, before);
    Ok(())
}

#[test]
fn role_options_follow_the_loaded_knowledge() -> Result<()> {
    let fixture = KnowledgeFixture::new();
    let knowledge = fixture.knowledge()?;
    let engine = WizardEngine::default();
    let session = engine.advance(&engine.start(), "Full Campaign", &knowledge)?;

    let prompt = engine.present(&session, &knowledge)?;
    assert_eq!(
        prompt.options,
        Some(vec![
            "IT Director".to_string(),
            "Support Manager".to_string(),
            "VP Customer Support".to_string(),
            "General".to_string(),
        ])
    );
    Ok(())
}

#[test]
fn completed_questionnaire_yields_a_brief() -> Result<()> {
    let fixture = KnowledgeFixture::new();
    let knowledge = fixture.knowledge()?;
    let engine = WizardEngine::default();

    let mut session = engine.start();
    for answer in [
        "full campaign",
        "vp customer support",
        "Broad Awareness",
        "increase trials",
        "3",
    ] {
        session = engine.advance(&session, answer, &knowledge)?;
    }
    assert_eq!(session.current(), SUMMARY);
    assert!(engine.is_complete(&session));
    assert_eq!(session.response(TARGET_ROLE), Some("VP Customer Support"));

    let summary = engine.present(&session, &knowledge)?;
    assert!(summary.is_final);
    assert!(summary.message.contains("Goals: increase trials"));

    let err = engine.advance(&session, "again", &knowledge).unwrap_err();
    assert!(matches!(err, WizardError::AlreadyComplete { .. }));

    let brief = BuildBrief::from_session(&session, engine.graph())?;
    assert_eq!(brief.mode, BuildMode::FullCampaign);
    assert_eq!(brief.role, RoleId::Named("VP Customer Support".into()));
    assert!(!brief.in_market);
    assert_eq!(brief.goals, "increase trials");
    assert_eq!(brief.group_count, 3);
    Ok(())
}

#[test]
fn reset_clears_answers_but_keeps_identity() -> Result<()> {
    let fixture = KnowledgeFixture::new();
    let knowledge = fixture.knowledge()?;
    let engine = WizardEngine::default();
    let session = engine.advance(&engine.start(), "Ads Only", &knowledge)?;
    let session = engine.advance(&session, "General", &knowledge)?;

    let fresh = engine.reset(&session);
    assert_eq!(fresh.current(), WELCOME);
    assert!(fresh.responses().is_empty());
    assert_eq!(fresh.session_id(), session.session_id());
    assert!(matches!(
        engine.retreat(&fresh),
        Err(WizardError::NoPreviousStage)
    ));
    Ok(())
}

#[test]
fn custom_stage_tables_load_from_toml() -> Result<()> {
    let fixture = KnowledgeFixture::new();
    let knowledge = fixture.knowledge()?;
    let path = fixture.harness.write_table(
        "stages.toml",
        r#"
[[stage]]
id = "welcome"
message = "What should we build?"
next = "target_role"
options = { kind = "fixed", choices = ["Ads Only"] }

[[stage]]
id = "target_role"
message = "Who is it for?"
next = "summary"
options = { kind = "knowledge_roles" }

[[stage]]
id = "summary"
message = "Building {welcome} for {target_role}."
is_final = true
"#,
    );
    let engine = WizardEngine::new(StageGraph::load_from_path(&path)?);
    let session = engine.advance(&engine.start(), "ads only", &knowledge)?;
    let session = engine.advance(&session, "General", &knowledge)?;
    let prompt = engine.present(&session, &knowledge)?;
    assert_eq!(prompt.message, "Building Ads Only for General.");

    let brief = BuildBrief::from_session(&session, engine.graph())?;
    assert_eq!(brief.mode, BuildMode::AdsOnly);
    assert_eq!(brief.role, RoleId::General);
    assert!(brief.in_market);
    assert_eq!(brief.group_count, 1);
    assert!(session.response(AUDIENCE).is_none());
    assert!(session.response(CAMPAIGN_GOALS).is_none());
    assert!(session.response(AD_GROUP_COUNT).is_none());
    Ok(())
}
