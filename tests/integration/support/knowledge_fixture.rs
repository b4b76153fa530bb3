use super::super::IntegrationHarness;
use anyhow::Result;
use ppcbuilder::chat::CampaignChat;
use ppcbuilder::knowledge::{KnowledgeBase, TabularSource};

pub const ROLES_TABLE: &str = "\
Category_Name,Job_Title,Pain_Point_1,Pain_Point_2,Value Prop_1,Value Prop_2,Feature_1,Benefit_1,Seniority_Level_1,Department_1
Help Desk,VP Customer Support,Long response times,Poor visibility,Faster resolution,Real-time dashboards,Smart routing,shorter queues,VP,Customer Support
Help Desk,Support Manager,Ticket backlog,Agent burnout,Automated triage,Balanced workloads,Macros,consistent answers,Manager,Customer Support
Help Desk,IT Director,,,,,,,Director,IT
CRM,Sales Director,Pipeline leaks,,Accurate forecasts,,,,Director,Sales
";

pub const VP_TABLE: &str = "\
Pain_Point_1,Pain_Point_2,Value_Prop_1,Business Outcomes_1
Poor visibility,Escalation chaos,Real-time dashboards,Lower churn
";

pub struct KnowledgeFixture {
    pub harness: IntegrationHarness,
}

impl KnowledgeFixture {
    /// Aggregate table plus a dedicated table for the VP role only.
    pub fn new() -> Self {
        let harness = IntegrationHarness::new();
        harness.write_table("roles.csv", ROLES_TABLE);
        harness.write_table("vp_customer_support.csv", VP_TABLE);
        Self { harness }
    }

    pub fn knowledge(&self) -> Result<KnowledgeBase> {
        let source = TabularSource::from_csv_str("roles", ROLES_TABLE)?;
        Ok(KnowledgeBase::load(&[source], "Help Desk")?)
    }

    pub fn chat(&self) -> Result<CampaignChat> {
        CampaignChat::from_config(&self.harness.config())
    }
}
