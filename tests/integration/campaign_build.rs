use super::support::knowledge_fixture::KnowledgeFixture;
use anyhow::Result;
use ppcbuilder::chat::BuildArtifact;
use ppcbuilder::config::GenerationSettings;
use ppcbuilder::knowledge::RoleId;
use ppcbuilder::synthesis::limits::MAX_AD_GROUPS;
use ppcbuilder::synthesis::{AdOrigin, ContentSynthesizer};
use ppcbuilder::wizard::stages::SUMMARY;
use std::fs;

#[test]
fn requested_group_count_is_clamped() -> Result<()> {
    let knowledge = KnowledgeFixture::new().knowledge()?;
    let synthesizer = ContentSynthesizer::new(GenerationSettings::default());
    let role = RoleId::Named("Support Manager".into());

    let campaign = synthesizer.synthesize_campaign(&knowledge, &role, true, "increase trials", 15)?;
    assert_eq!(campaign.ad_groups.len(), MAX_AD_GROUPS);
    assert_eq!(campaign.role, "Support Manager");

    let campaign = synthesizer.synthesize_campaign(&knowledge, &role, false, "", 0)?;
    assert_eq!(campaign.ad_groups.len(), 1);
    assert!(!campaign.in_market);
    Ok(())
}

#[test]
fn chat_builds_and_exports_a_full_campaign() -> Result<()> {
    let fixture = KnowledgeFixture::new();
    let mut chat = fixture.chat()?;

    for answer in [
        "Full Campaign",
        "VP Customer Support",
        "In-Market",
        "increase trials",
        "3",
    ] {
        chat.respond(answer)?;
    }
    let prompt = chat.prompt()?;
    assert_eq!(prompt.stage_id, SUMMARY);
    assert!(prompt.message.contains("Target role: VP Customer Support"));

    let artifact = chat.generate()?;
    let BuildArtifact::Campaign { ads, structure } = &artifact else {
        panic!("expected a campaign artifact");
    };
    assert_eq!(ads.origin, AdOrigin::Template);
    assert!(ads.variant.is_within_limits());
    assert_eq!(
        ads.variant.headlines,
        vec!["Solve Long response times with", "Solve Poor visibility with"]
    );
    assert_eq!(structure.ad_groups.len(), 3);
    assert_eq!(structure.goals, "increase trials");

    chat.edit_group(0, "Ticketing", &["ticketing system", "help desk"])?;
    let renamed = chat.edit_group(2, "Live Chat", &[])?;
    assert_eq!(renamed.name, "Live Chat");
    let extended = chat.edit_group(0, "  ", &["help desk", "support software"])?;
    assert_eq!(extended.name, "Ticketing");
    assert_eq!(extended.keywords.len(), 3);

    let campaign_path = fixture.harness.workspace_path().join("campaign.csv");
    let written = chat.export(&campaign_path)?;
    let ads_path = fixture.harness.workspace_path().join("campaign_ads.csv");
    assert_eq!(written, vec![campaign_path.clone(), ads_path.clone()]);
    assert_eq!(
        fs::read_to_string(&campaign_path)?,
        "Ad Group,Keywords\nTicketing,help desk; support software; ticketing system\n,\nLive Chat,\n"
    );

    let exported = fs::read_to_string(&ads_path)?;
    let rows: Vec<&str> = exported.lines().collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[1].starts_with("Solve Long response times with,Solve Poor visibility with,"));
    Ok(())
}

#[test]
fn group_edits_are_rejected_without_a_campaign() -> Result<()> {
    let fixture = KnowledgeFixture::new();
    let mut chat = fixture.chat()?;
    assert!(chat.edit_group(0, "Ticketing", &[]).is_err());
    assert!(chat.export(&fixture.harness.workspace_path().join("none.csv")).is_err());

    for answer in ["Ads Only", "General", "In-Market", "more demos", "2"] {
        chat.respond(answer)?;
    }
    chat.generate()?;
    let err = chat.edit_group(0, "Ticketing", &[]).unwrap_err();
    assert!(err.to_string().contains("no ad groups"));

    let ads_path = fixture.harness.workspace_path().join("ads.csv");
    assert_eq!(chat.export(&ads_path)?, vec![ads_path.clone()]);
    assert!(!fixture.harness.workspace_path().join("ads_ads.csv").exists());
    Ok(())
}

#[test]
fn out_of_range_groups_and_going_back_drop_edits() -> Result<()> {
    let fixture = KnowledgeFixture::new();
    let mut chat = fixture.chat()?;
    for answer in ["Full Campaign", "Support Manager", "In-Market", "fewer escalations", "2"] {
        chat.respond(answer)?;
    }
    chat.generate()?;
    let err = chat.edit_group(5, "Sixth", &[]).unwrap_err();
    assert!(err.to_string().contains("does not exist"));

    chat.back()?;
    assert!(chat.artifact().is_none());
    Ok(())
}

#[test]
fn ads_only_builds_skip_the_campaign_structure() -> Result<()> {
    let fixture = KnowledgeFixture::new();
    let mut chat = fixture.chat()?;
    for answer in ["Ads Only", "General", "Broad Awareness", "brand recall", "1"] {
        chat.respond(answer)?;
    }
    let artifact = chat.generate()?;
    assert!(matches!(artifact, BuildArtifact::Ads { .. }));

    let json = serde_json::to_value(&artifact)?;
    assert_eq!(json["kind"], "ads");
    assert_eq!(json["ads"]["origin"], "template");
    Ok(())
}

#[test]
fn generating_before_the_summary_fails() -> Result<()> {
    let fixture = KnowledgeFixture::new();
    let mut chat = fixture.chat()?;
    chat.respond("Full Campaign")?;
    assert!(chat.generate().is_err());

    chat.back()?;
    let prompt = chat.restart()?;
    assert_eq!(prompt.prefill, None);
    assert!(chat.session().responses().is_empty());
    Ok(())
}

#[test]
fn reloading_sources_keeps_the_conversation() -> Result<()> {
    let fixture = KnowledgeFixture::new();
    let config = fixture.harness.config();
    let mut chat = fixture.chat()?;
    chat.respond("Full Campaign")?;

    fixture.harness.write_table(
        "it_director.csv",
        "Pain_Point_1,Value_Prop_1\nAsset sprawl,Single inventory\n",
    );
    let knowledge = chat.reload_from_dir(&fixture.harness.sources_dir(), &config)?;
    let director = knowledge
        .profile(&RoleId::Named("IT Director".into()))
        .expect("director profile");
    assert_eq!(director.pain_points, vec!["Asset sprawl"]);

    let prompt = chat.respond("IT Director")?;
    assert_eq!(chat.session().response("welcome"), Some("Full Campaign"));
    assert_eq!(prompt.options.as_deref().map(|o| o.len()), Some(2));
    Ok(())
}

#[test]
fn chat_requires_a_sources_directory() {
    let fixture = KnowledgeFixture::new();
    let mut config = fixture.harness.config();
    config.knowledge.sources_dir = None;
    assert!(ppcbuilder::CampaignChat::from_config(&config).is_err());
}
