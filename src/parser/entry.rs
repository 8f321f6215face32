use crate::parser::nodes::Item;
use crate::parser::rules::{Extraction, RuleResult, RULES};

/// Classification of one log entry. Explicit result instead of control-flow
/// signals: every call site handles all three cases.
#[derive(Debug)]
pub enum Outcome {
    Record(Extraction),
    /// Recognized noise (testing artifacts, blank days, bare names,
    /// exclusion-listed corruption); not an error.
    Ignore,
    /// No rule recognized the entry, or its structure defeated extraction.
    Error(String),
}

/// Run one entry through the rule cascade; first match wins. An extraction
/// with an empty article name is noise (bot bug), not a record.
pub fn classify(item: &Item) -> Outcome {
    for rule in RULES {
        let Some(caps) = rule.matcher.captures(&item.text) else {
            continue;
        };
        match (rule.extract)(&caps, item) {
            RuleResult::Extract(ex) => {
                if ex.article_name.is_empty() {
                    return Outcome::Ignore;
                }
                return Outcome::Record(ex);
            }
            RuleResult::Ignore => return Outcome::Ignore,
            RuleResult::Fail(reason) => return Outcome::Error(reason),
            RuleResult::Pass => continue,
        }
    }
    Outcome::Error("unrecognized format".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::nodes::Link;
    use crate::parser::rules::EXCLUDED_ENTRIES;
    use crate::record::Action;

    fn item(text: &str) -> Item {
        Item {
            toc: false,
            text: text.to_string(),
            links: Vec::new(),
        }
    }

    fn item_with_links(text: &str, link_texts: &[&str]) -> Item {
        Item {
            toc: false,
            text: text.to_string(),
            links: link_texts
                .iter()
                .map(|t| Link {
                    text: t.to_string(),
                    href: format!("/wiki/{t}"),
                })
                .collect(),
        }
    }

    fn expect_record(outcome: Outcome) -> Extraction {
        match outcome {
            Outcome::Record(ex) => ex,
            other => panic!("expected record, got {other:?}"),
        }
    }

    #[test]
    fn assessed_with_both_ratings() {
        let it = item_with_links(
            "Dog (talk) assessed. Quality assessed as Start-Class (rev · t). \
             Importance assessed as Mid-Class (rev · t).",
            &["Dog", "talk", "rev", "t", "rev", "t"],
        );
        let ex = expect_record(classify(&it));
        assert_eq!(ex.action, Action::Assessed);
        assert_eq!(ex.article_name, "Dog");
        assert_eq!(ex.new_quality, "Start-Class");
        assert_eq!(ex.new_importance, "Mid-Class");
        assert_eq!(ex.old_quality, "");
        assert_eq!(ex.old_importance, "");
    }

    #[test]
    fn assessed_name_with_parentheses_comes_from_link() {
        let it = item_with_links(
            "Python (programming language) (talk) assessed. Quality assessed as B-Class (rev · t).",
            &["Python (programming language)", "talk", "rev", "t"],
        );
        let ex = expect_record(classify(&it));
        assert_eq!(ex.article_name, "Python (programming language)");
        assert_eq!(ex.new_quality, "B-Class");
    }

    #[test]
    fn reassessed_quality_change() {
        let it = item_with_links(
            "Cat (talk) reassessed. Quality rating changed from Stub-Class to Start-Class.",
            &["Cat", "talk"],
        );
        let ex = expect_record(classify(&it));
        assert_eq!(ex.action, Action::Reassessed);
        assert_eq!(ex.article_name, "Cat");
        assert_eq!(ex.old_quality, "Stub-Class");
        assert_eq!(ex.new_quality, "Start-Class");
        assert_eq!(ex.new_importance, "");
    }

    #[test]
    fn reassessed_importance_change() {
        let it = item(
            "Cat (talk) reassessed. Importance rating changed from Low-Class to Mid-Class (rev · t).",
        );
        let ex = expect_record(classify(&it));
        assert_eq!(ex.action, Action::Reassessed);
        assert_eq!(ex.old_importance, "Low-Class");
        assert_eq!(ex.new_importance, "Mid-Class");
    }

    #[test]
    fn reassessed_inline_form() {
        let it = item("Horse reassessed from Stub-Class (Low-Class) to Start-Class(Mid-Class)");
        let ex = expect_record(classify(&it));
        assert_eq!(ex.action, Action::Reassessed);
        assert_eq!(ex.article_name, "Horse");
        assert_eq!(ex.old_quality, "Stub-Class");
        assert_eq!(ex.old_importance, "Low-Class");
        assert_eq!(ex.new_quality, "Start-Class");
        assert_eq!(ex.new_importance, "Mid-Class");
    }

    #[test]
    fn assessed_talk_after_name_comes_from_link() {
        let it = item_with_links(
            "Dog assessed. Quality assessed as Start-Class (rev · t).",
            &["Dog", "rev", "t"],
        );
        let ex = expect_record(classify(&it));
        assert_eq!(ex.action, Action::Assessed);
        assert_eq!(ex.article_name, "Dog");
        assert_eq!(ex.new_quality, "Start-Class");
    }

    #[test]
    fn assessed_talk_after_without_links_is_error() {
        let it = item("Dog assessed. Quality assessed as Start-Class (rev · t).");
        assert!(matches!(classify(&it), Outcome::Error(_)));
    }

    #[test]
    fn renamed_with_assessment_keeps_old_importance() {
        let it = item("Old Town (talk) B-Class (High-Class) renamed to New Town.");
        let ex = expect_record(classify(&it));
        assert_eq!(ex.action, Action::Renamed);
        assert_eq!(ex.article_name, "Old Town");
        assert_eq!(ex.old_importance, "High-Class");
        assert_eq!(ex.new_article_name, "New Town.");
        assert_eq!(ex.old_quality, "");
    }

    // Nested parentheses in the talk link defeat the sentence patterns, so
    // these route through the link-position rule.
    const NESTED_RENAME: &str = "Foo (x) (Talk:Foo (x)|talk) renamed to Bar (y)";

    #[test]
    fn renamed_two_links_takes_second() {
        let it = item_with_links(NESTED_RENAME, &["Foo (x)", "Bar (y)"]);
        let ex = expect_record(classify(&it));
        assert_eq!(ex.action, Action::Renamed);
        assert_eq!(ex.article_name, "Foo (x)");
        assert_eq!(ex.new_article_name, "Bar (y)");
    }

    #[test]
    fn renamed_three_links_takes_third() {
        let it = item_with_links(NESTED_RENAME, &["Foo (x)", "talk", "Bar (y)"]);
        let ex = expect_record(classify(&it));
        assert_eq!(ex.article_name, "Foo (x)");
        assert_eq!(ex.new_article_name, "Bar (y)");
    }

    #[test]
    fn renamed_new_name_resolving_to_talk_label_is_error() {
        let it = item_with_links(NESTED_RENAME, &["Foo (x)", "talk"]);
        assert!(matches!(classify(&it), Outcome::Error(_)));
    }

    #[test]
    fn renamed_single_link_is_error() {
        let it = item_with_links(NESTED_RENAME, &["Foo (x)"]);
        assert!(matches!(classify(&it), Outcome::Error(_)));
    }

    #[test]
    fn renamed_plain_sentence() {
        let it = item("Old Name renamed to New Name.");
        let ex = expect_record(classify(&it));
        assert_eq!(ex.action, Action::Renamed);
        assert_eq!(ex.article_name, "Old Name");
        assert_eq!(ex.new_article_name, "New Name");
    }

    #[test]
    fn moved_with_talk_labels_is_rename() {
        let it = item("Foo talk moved to Bar talk");
        let ex = expect_record(classify(&it));
        assert_eq!(ex.action, Action::Renamed);
        assert_eq!(ex.article_name, "Foo");
        assert_eq!(ex.new_article_name, "Bar");
    }

    #[test]
    fn added_with_nested_talk_parens() {
        let it = item("Ship (Talk:Ship (1911) talk) B-Class (Low-Class) added");
        let ex = expect_record(classify(&it));
        assert_eq!(ex.action, Action::Assessed);
        assert_eq!(ex.article_name, "Ship");
        assert_eq!(ex.new_quality, "B-Class");
        assert_eq!(ex.new_importance, "Low-Class");
    }

    #[test]
    fn added_strips_leftover_brackets() {
        let it = item("[[Ship]] (Talk:Ship (1911) talk) B-Class (Low-Class) added");
        let ex = expect_record(classify(&it));
        assert_eq!(ex.article_name, "Ship");
    }

    #[test]
    fn added_plain_and_created() {
        let ex = expect_record(classify(&item("Ship (talk) added")));
        assert_eq!(ex.action, Action::Assessed);
        assert_eq!(ex.article_name, "Ship");

        let ex = expect_record(classify(&item("Ship (Talk:Ship|talk) Created as stub")));
        assert_eq!(ex.action, Action::Assessed);
        assert_eq!(ex.article_name, "Ship");
    }

    #[test]
    fn recreated_with_class() {
        let ex = expect_record(classify(&item("Ship (talk) Stub-Class recreated")));
        assert_eq!(ex.action, Action::Assessed);
        assert_eq!(ex.article_name, "Ship");
        assert_eq!(ex.new_quality, "Stub-Class");
    }

    #[test]
    fn removed_plain() {
        let ex = expect_record(classify(&item("Ship (talk) removed.")));
        assert_eq!(ex.action, Action::Removed);
        assert_eq!(ex.article_name, "Ship");
        assert_eq!(ex.old_importance, "");
    }

    #[test]
    fn removed_with_assessment_keeps_old_importance() {
        let ex = expect_record(classify(&item(
            "Ship (talk) Stub-Class (Low-Class) removed.",
        )));
        assert_eq!(ex.action, Action::Removed);
        assert_eq!(ex.old_importance, "Low-Class");
    }

    #[test]
    fn removed_without_name_is_ignored() {
        assert!(matches!(
            classify(&item("(talk) Stub-Class (Low-Class) removed.")),
            Outcome::Ignore
        ));
    }

    #[test]
    fn removed_no_talk_form() {
        let ex = expect_record(classify(&item("Ship removed.")));
        assert_eq!(ex.action, Action::Removed);
        assert_eq!(ex.article_name, "Ship");
    }

    #[test]
    fn moved_from_to_is_reassessment() {
        let ex = expect_record(classify(&item(
            "Ship moved from Stub-Class (Low-Class) to Start-Class (Mid-Class)",
        )));
        assert_eq!(ex.action, Action::Reassessed);
        assert_eq!(ex.old_quality, "Stub-Class");
        assert_eq!(ex.old_importance, "Low-Class");
        assert_eq!(ex.new_quality, "Start-Class");
        assert_eq!(ex.new_importance, "Mid-Class");
    }

    #[test]
    fn good_article_upgrade() {
        let ex = expect_record(classify(&item("Ship upgraded to good article status")));
        assert_eq!(ex.action, Action::Reassessed);
        assert_eq!(ex.new_quality, "GA-Class");
    }

    #[test]
    fn noise_forms_are_ignored() {
        for text in [
            "Temp bot test entry",
            "Ship (talk) B-Class (Low-Class)",
            "(talk) dangling entry",
            "(No changes today)",
            "^ stray markup from one project",
        ] {
            assert!(
                matches!(classify(&item(text)), Outcome::Ignore),
                "expected ignore for {text:?}"
            );
        }
    }

    #[test]
    fn every_excluded_entry_is_ignored() {
        for text in EXCLUDED_ENTRIES.iter() {
            assert!(
                matches!(classify(&item(text)), Outcome::Ignore),
                "expected ignore for {text:?}"
            );
        }
    }

    #[test]
    fn bare_linked_name_is_ignored() {
        let it = item_with_links("Lonesome Article", &["Lonesome Article"]);
        assert!(matches!(classify(&it), Outcome::Ignore));
    }

    #[test]
    fn unrecognized_text_is_an_error() {
        assert!(matches!(
            classify(&item("this sentence matches no known bot output")),
            Outcome::Error(_)
        ));
    }

    #[test]
    fn specific_removed_rule_wins_over_generic() {
        // carries an assessment, so the talk-paren must not be mistaken for
        // the trailing "removed" form
        let ex = expect_record(classify(&item(
            "Ship (talk) B-Class (High-Class) removed.",
        )));
        assert_eq!(ex.action, Action::Removed);
        assert_eq!(ex.old_importance, "High-Class");
    }
}
