//! The ordered rule catalog and its resolution logic.
//!
//! Every element node resolves to exactly one rule: user rules are tried
//! first (most recently added first, which gives explicit override
//! semantics when two literal filters name the same tag), then the
//! built-in rules in registration order, then two classifier-driven
//! defaults, and finally a total fallback that passes content through.

mod commonmark;

use crate::classify;
use crate::dom::NodeRef;
use crate::options::Options;
use crate::render::RenderContext;

/// Replacement function: maps the rendered child content and the node to an
/// output fragment.
pub type Replacement =
    Box<dyn for<'a> Fn(&str, &NodeRef<'a>, &Options, &mut RenderContext) -> String + Send + Sync>;

/// Predicate form of a rule filter.
pub type Predicate = Box<dyn for<'a> Fn(&NodeRef<'a>, &Options) -> bool + Send + Sync>;

/// What a rule matches: a literal tag name, a set of tag names, or an
/// arbitrary predicate over the node and options.
pub enum Filter {
    /// Exact (case-insensitive) tag name.
    Tag(&'static str),
    /// Any of several tag names.
    Tags(&'static [&'static str]),
    /// Arbitrary, side-effect-free predicate.
    Predicate(Predicate),
}

impl Filter {
    fn matches(&self, node: &NodeRef, options: &Options) -> bool {
        match self {
            Self::Tag(name) => node.is_tag(name),
            Self::Tags(names) => names.iter().any(|name| node.is_tag(name)),
            Self::Predicate(predicate) => predicate(node, options),
        }
    }
}

/// One transformation rule.
pub struct Rule {
    name: &'static str,
    filter: Filter,
    replacement: Replacement,
    escape_content: bool,
}

impl Rule {
    /// Create a rule that escapes descendant text normally.
    pub fn new(name: &'static str, filter: Filter, replacement: Replacement) -> Self {
        Self {
            name,
            filter,
            replacement,
            escape_content: true,
        }
    }

    /// Mark the rule's descendant text as raw: reproduced byte-for-byte,
    /// with no escaping applied.
    #[must_use]
    pub fn raw_content(mut self) -> Self {
        self.escape_content = false;
        self
    }

    /// The rule's identifying name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn escapes_content(&self) -> bool {
        self.escape_content
    }

    pub(crate) fn apply(
        &self,
        content: &str,
        node: &NodeRef,
        options: &Options,
        ctx: &mut RenderContext,
    ) -> String {
        (self.replacement)(content, node, options, ctx)
    }
}

/// Ordered catalog of rules with a guaranteed-total fallback.
pub struct RuleTable {
    user_rules: Vec<Rule>,
    builtin_rules: Vec<Rule>,
    fallback: Rule,
}

impl RuleTable {
    /// Build the table with the built-in CommonMark rules and the
    /// classifier-driven defaults.
    pub fn new() -> Self {
        let mut builtin_rules = commonmark::rules();

        // Non-rendering elements produce nothing. Math scripts are exempt
        // because their rules sit earlier in the table.
        builtin_rules.push(Rule::new(
            "drop-non-rendering",
            Filter::Predicate(Box::new(|node, _| {
                node.tag_name()
                    .is_some_and(|name| classify::is_non_rendering(&name))
            })),
            Box::new(|_, _, _, _| String::new()),
        ));

        // Unmatched block elements wrap their content in a blank-line pair.
        builtin_rules.push(Rule::new(
            "default-block",
            Filter::Predicate(Box::new(|node, _| {
                node.tag_name().is_some_and(|name| classify::is_block(&name))
            })),
            Box::new(|content, _, _, _| format!("\n\n{content}\n\n")),
        ));

        // Total fallback: unmatched inline elements pass content through.
        let fallback = Rule::new(
            "default-inline",
            Filter::Predicate(Box::new(|_, _| true)),
            Box::new(|content, _, _, _| content.to_string()),
        );

        Self {
            user_rules: Vec::new(),
            builtin_rules,
            fallback,
        }
    }

    /// Register a user rule. User rules take priority over built-ins, and
    /// among user rules the most recently added wins.
    pub fn add(&mut self, rule: Rule) {
        self.user_rules.insert(0, rule);
    }

    /// Resolve the single applicable rule for an element node. First match
    /// in priority order wins; the fallback is total, so this cannot fail.
    pub fn resolve(&self, node: &NodeRef, options: &Options) -> &Rule {
        self.user_rules
            .iter()
            .chain(self.builtin_rules.iter())
            .find(|rule| rule.filter.matches(node, options))
            .unwrap_or(&self.fallback)
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::new()
    }
}
