pub mod auditor;
pub mod capital;
pub mod controller;
pub mod cqe;
pub mod ledger;
pub mod market;

pub use auditor::{Auditor, AuditSummary};
pub use capital::{CapitalFlowModel, CapitalFlowOutcome, CapitalMarket, RuleBasedCapitalFlow};
pub use controller::{BrakeOutcome, ControllerContext, ControllerState, PolicyController, RuleBasedController};
pub use cqe::{CentralBankAlliance, CqeDefense, CqeOutcome, RuleBasedCqe};
pub use ledger::TokenLedger;
pub use market::{InvestorMarket, MarketState, RuleBasedSentiment, SentimentContext, SentimentModel};
