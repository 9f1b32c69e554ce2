mod util;

pub mod classes;
pub mod comments;
pub mod conditionals;
pub mod errors;
pub mod functions;
pub mod loops;
pub mod naming;
pub mod variables;

// Naming rules
pub use naming::{
    AvoidMentalMappingRule, RedundantContextRule, SearchableLiteralRule, UnpronounceableRule,
};

// Function-shape rules
pub use functions::{
    DeadCodeRule, DefaultViaOrRule, FlagArgumentRule, GlobalWriteRule, MaxPositionalParamsRule,
    SingleLevelAbstractionRule,
};

// Conditional rules
pub use conditionals::{
    BooleanComparisonRule, DuplicateBranchesRule, EncapsulateConditionRule, MaxNestingRule,
    NegativePredicateRule,
};

// Loop rules
pub use loops::PreferForOfRule;

// Variable rules
pub use variables::{NoVarRule, PreferConstRule, UnusedDeclarationRule};

// Comment-hygiene rules
pub use comments::{CommentedOutCodeRule, JournalCommentRule, PositionalMarkerRule};

// Error-handling rules
pub use errors::{IgnoredCatchRule, ThrowLiteralRule};

// Class-design rules
pub use classes::ShallowHierarchyRule;

use crate::rule::RuleRegistry;

/// Registry preloaded with the whole built-in catalog.
pub fn default_rules() -> RuleRegistry {
    RuleRegistry::new()
        .with_rule(SearchableLiteralRule)
        .with_rule(AvoidMentalMappingRule)
        .with_rule(RedundantContextRule)
        .with_rule(UnpronounceableRule)
        .with_rule(MaxPositionalParamsRule)
        .with_rule(DefaultViaOrRule)
        .with_rule(SingleLevelAbstractionRule)
        .with_rule(FlagArgumentRule)
        .with_rule(DeadCodeRule)
        .with_rule(GlobalWriteRule)
        .with_rule(NegativePredicateRule)
        .with_rule(EncapsulateConditionRule)
        .with_rule(BooleanComparisonRule)
        .with_rule(MaxNestingRule)
        .with_rule(DuplicateBranchesRule)
        .with_rule(PreferForOfRule)
        .with_rule(PreferConstRule)
        .with_rule(NoVarRule)
        .with_rule(UnusedDeclarationRule)
        .with_rule(JournalCommentRule)
        .with_rule(PositionalMarkerRule)
        .with_rule(CommentedOutCodeRule)
        .with_rule(IgnoredCatchRule)
        .with_rule(ThrowLiteralRule)
        .with_rule(ShallowHierarchyRule)
}
