//! Landing pages that fix one facet value for every query they issue.

use serde::Serialize;

use super::facets::{Facet, PinnedFacet};

/// The kind of landing page, which decides the facet it pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LandingKind {
    Category,
    Role,
    Outcome,
    Capability,
}

impl LandingKind {
    #[must_use]
    pub const fn facet(self) -> Facet {
        match self {
            Self::Category => Facet::Category,
            Self::Role => Facet::Roles,
            Self::Outcome => Facet::ValueStreams,
            Self::Capability => Facet::Capabilities,
        }
    }

    /// Every landing page of this kind, in navigation order.
    #[must_use]
    pub const fn pages(self) -> &'static [LandingPage] {
        match self {
            Self::Category => CATEGORY_PAGES,
            Self::Role => ROLE_PAGES,
            Self::Outcome => OUTCOME_PAGES,
            Self::Capability => CAPABILITY_PAGES,
        }
    }
}

/// A landing page: the URL slug, its copy, and the backend attribute value it
/// pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LandingPage {
    pub slug: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub backend_value: &'static str,
}

impl LandingPage {
    const fn new(
        slug: &'static str,
        title: &'static str,
        description: &'static str,
        backend_value: &'static str,
    ) -> Self {
        Self {
            slug,
            title,
            description,
            backend_value,
        }
    }

    /// The facet constraint this page adds to every listing it renders.
    #[must_use]
    pub fn pin(&self, kind: LandingKind) -> PinnedFacet {
        PinnedFacet::new(kind.facet(), self.backend_value)
    }
}

/// Look up a landing page by URL slug. Matching is exact.
#[must_use]
pub fn find_landing(kind: LandingKind, slug: &str) -> Option<&'static LandingPage> {
    kind.pages().iter().find(|page| page.slug == slug)
}

const CATEGORY_PAGES: &[LandingPage] = &[
    LandingPage::new(
        "agents",
        "AI Agents",
        "Autonomous AI agents that handle complex tasks and workflows",
        "agent",
    ),
    LandingPage::new(
        "apps",
        "Apps",
        "Applications and integrations to extend your platform",
        "app",
    ),
    LandingPage::new(
        "assistants",
        "AI Assistants",
        "Conversational AI assistants for various use cases",
        "assistant",
    ),
    LandingPage::new(
        "automations",
        "Automations",
        "Workflow automation tools to streamline operations",
        "automation",
    ),
];

const ROLE_PAGES: &[LandingPage] = &[
    LandingPage::new(
        "customer-support",
        "Customer Support",
        "AI workers to reduce ticket volume and improve resolution times",
        "customer_support",
    ),
    LandingPage::new(
        "sales",
        "Sales / SDR",
        "Automate outreach and qualification to focus on closing deals",
        "sales_sdr",
    ),
    LandingPage::new(
        "marketing",
        "Marketing",
        "Create on-brand content and automate campaign workflows",
        "marketing",
    ),
    LandingPage::new(
        "hr",
        "HR",
        "Streamline recruitment, onboarding, and employee experience",
        "hr",
    ),
    LandingPage::new(
        "it-helpdesk",
        "IT / Helpdesk",
        "Resolve IT issues faster with intelligent ticketing and automation",
        "it_helpdesk",
    ),
    LandingPage::new(
        "operations",
        "Operations",
        "Automate workflows and extract insights from operational data",
        "operations",
    ),
    LandingPage::new(
        "finance",
        "Finance",
        "Automate financial operations and reporting",
        "finance",
    ),
];

const OUTCOME_PAGES: &[LandingPage] = &[
    LandingPage::new(
        "customer_support",
        "Reduce Support Tickets",
        "AI agents that handle customer inquiries, reducing ticket volume by up to 40%",
        "customer_support",
    ),
    LandingPage::new(
        "sales_outreach",
        "Send Personalized Outreach",
        "Automate personalized sales emails and follow-ups at scale",
        "sales_outreach",
    ),
    LandingPage::new(
        "knowledge_assistant",
        "Turn Documents into Answers",
        "Knowledge assistants that answer questions from your documents",
        "knowledge_assistant",
    ),
    LandingPage::new(
        "meeting_scheduler",
        "Book Meetings Automatically",
        "AI that coordinates scheduling across time zones and calendars",
        "meeting_scheduler",
    ),
    LandingPage::new(
        "marketing_content",
        "Create On-Brand Content",
        "Generate marketing content that matches your brand voice",
        "marketing_content",
    ),
    LandingPage::new(
        "data_extraction",
        "Extract Data from Files",
        "Automatically extract structured data from documents and images",
        "data_extraction",
    ),
    LandingPage::new(
        "monitoring_alerting",
        "Monitor & Alert on Changes",
        "Automated monitoring with real-time alerts",
        "monitoring_alerting",
    ),
    LandingPage::new(
        "hr_ops",
        "Streamline HR Ops",
        "Automate HR workflows from onboarding to employee support",
        "hr_ops",
    ),
];

const CAPABILITY_PAGES: &[LandingPage] = &[
    LandingPage::new(
        "rag_knowledgebase",
        "RAG Knowledgebase",
        "Retrieval-augmented generation for accurate answers from your documents",
        "rag.knowledge_base",
    ),
    LandingPage::new(
        "web_widget",
        "Web Widget",
        "Embeddable chat widget for your website with custom branding",
        "web_widget.branding",
    ),
    LandingPage::new(
        "chat_ui",
        "Chat UI",
        "Conversational interface for natural language interactions",
        "chat_ui.floating",
    ),
    LandingPage::new(
        "multilingual",
        "Multilingual",
        "Support for multiple languages with automatic translation",
        "multilingual.i18n",
    ),
    LandingPage::new(
        "mcp_tools",
        "MCP Tools",
        "Model Context Protocol tools for extended AI capabilities",
        "integrations.mcp_tools",
    ),
    LandingPage::new(
        "tool_connectors",
        "Tool Connectors",
        "Pre-built integrations with popular business tools",
        "integrations.tool_connectors",
    ),
    LandingPage::new(
        "scheduler_triggers",
        "Scheduler & Triggers",
        "Automated scheduling and event-based triggers",
        "ops.scheduling",
    ),
    LandingPage::new(
        "guardrails_policy",
        "Guardrails & Policies",
        "Safety guardrails and policy enforcement for AI outputs",
        "governance.guardrails",
    ),
];

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::{FilterState, compile, slugs};

    #[test]
    fn test_find_landing_maps_url_slug_to_backend_value() {
        let page = find_landing(LandingKind::Role, "it-helpdesk").unwrap();
        assert_eq!(page.backend_value, "it_helpdesk");
        assert_eq!(page.title, "IT / Helpdesk");

        let page = find_landing(LandingKind::Capability, "mcp_tools").unwrap();
        assert_eq!(page.backend_value, "integrations.mcp_tools");
    }

    #[test]
    fn test_unknown_landing_slug_is_none() {
        assert!(find_landing(LandingKind::Outcome, "world_peace").is_none());
        assert!(find_landing(LandingKind::Category, "agent").is_none());
    }

    #[test]
    fn test_slugs_are_unique_per_kind() {
        for kind in [
            LandingKind::Category,
            LandingKind::Role,
            LandingKind::Outcome,
            LandingKind::Capability,
        ] {
            let pages = kind.pages();
            for (i, page) in pages.iter().enumerate() {
                assert!(
                    pages.iter().skip(i + 1).all(|p| p.slug != page.slug),
                    "duplicate landing slug {}",
                    page.slug
                );
            }
        }
    }

    #[test]
    fn test_role_pin_compiles_first_and_unions_with_selection() {
        let page = find_landing(LandingKind::Role, "sales").unwrap();
        let pin = page.pin(LandingKind::Role);
        let state = FilterState::from_pairs([("roles", "marketing"), ("trust", "verified")]);

        let filter = compile(&state, Some(&pin)).unwrap();

        let roles = filter.clauses().first().unwrap();
        assert_eq!(roles.slug, slugs::ROLES);
        assert_eq!(roles.values, ["sales_sdr", "marketing"]);
        assert_eq!(filter.len(), 2);
    }
}
