//! Credit plans and the billing ledger.
//!
//! The server tracks a single in-memory ledger for one default user. A
//! live chat action costs a fixed number of credits; the offline engine
//! is free.

use serde::{Deserialize, Serialize};

/// Credits deducted per chat message answered by the live engine.
pub const CHAT_ACTION_COST: u64 = 5;

/// The available subscription plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    /// Free tier.
    #[default]
    Lite,
    Plus,
    Pro,
    /// Effectively unlimited; JSON carries no infinity, so this is a
    /// large finite allowance.
    Ultra,
}

impl PlanKind {
    /// Returns all plans in upgrade order.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Lite, Self::Plus, Self::Pro, Self::Ultra]
    }

    /// Parses a plan from its wire name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "lite" => Some(Self::Lite),
            "plus" => Some(Self::Plus),
            "pro" => Some(Self::Pro),
            "ultra" => Some(Self::Ultra),
            _ => None,
        }
    }

    /// Returns the wire name of this plan.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Lite => "lite",
            Self::Plus => "plus",
            Self::Pro => "pro",
            Self::Ultra => "ultra",
        }
    }

    /// Returns the monthly credit allowance for this plan.
    #[must_use]
    pub const fn monthly_credits(self) -> u64 {
        match self {
            Self::Lite => 100,
            Self::Plus => 500,
            Self::Pro => 2_000,
            Self::Ultra => 1_000_000,
        }
    }
}

/// The in-memory credit ledger for the default user.
#[derive(Debug, Clone)]
pub struct BillingLedger {
    plan: PlanKind,
    credits: u64,
}

impl Default for BillingLedger {
    fn default() -> Self {
        Self::new(PlanKind::Lite)
    }
}

impl BillingLedger {
    /// Creates a ledger on the given plan with its full allowance.
    #[must_use]
    pub const fn new(plan: PlanKind) -> Self {
        Self {
            plan,
            credits: plan.monthly_credits(),
        }
    }

    /// Returns the current plan.
    #[must_use]
    pub const fn plan(&self) -> PlanKind {
        self.plan
    }

    /// Returns the remaining credit balance.
    #[must_use]
    pub const fn credits(&self) -> u64 {
        self.credits
    }

    /// Deducts `cost` credits if the balance covers it.
    ///
    /// Returns `false` (leaving the balance untouched) when it does not.
    pub fn debit(&mut self, cost: u64) -> bool {
        match self.credits.checked_sub(cost) {
            Some(rest) => {
                self.credits = rest;
                true
            }
            None => false,
        }
    }

    /// Switches to a new plan and resets the balance to its allowance.
    pub fn upgrade(&mut self, plan: PlanKind) {
        self.plan = plan;
        self.credits = plan.monthly_credits();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_parse_roundtrip() {
        for plan in PlanKind::all() {
            assert_eq!(PlanKind::parse(plan.name()), Some(plan));
        }
        assert_eq!(PlanKind::parse("platinum"), None);
    }

    #[test]
    fn plan_json_format() {
        let json = serde_json::to_string(&PlanKind::Lite).expect("serialize");
        assert_eq!(json, r#""lite""#);
    }

    #[test]
    fn debit_decrements_until_exhausted() {
        let mut ledger = BillingLedger::new(PlanKind::Lite);
        assert_eq!(ledger.credits(), 100);

        for _ in 0..20 {
            assert!(ledger.debit(CHAT_ACTION_COST));
        }
        assert_eq!(ledger.credits(), 0);

        assert!(!ledger.debit(CHAT_ACTION_COST));
        assert_eq!(ledger.credits(), 0);
    }

    #[test]
    fn upgrade_resets_allowance() {
        let mut ledger = BillingLedger::new(PlanKind::Lite);
        assert!(ledger.debit(50));

        ledger.upgrade(PlanKind::Pro);
        assert_eq!(ledger.plan(), PlanKind::Pro);
        assert_eq!(ledger.credits(), 2_000);
    }
}
