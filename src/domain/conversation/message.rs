//! Outbound message content.
//!
//! Prompts describe what each interactive card must offer; rendering them
//! into a concrete chat payload is the messaging adapter's job.

use serde::{Deserialize, Serialize};

use crate::domain::catalog::Catalog;
use crate::domain::cooking::TasteStatus;
use crate::domain::foundation::{DishId, SessionId};

/// Maximum entries in the "recently cooked" and "frequently cooked" lists.
pub const SHORTLIST_LEN: usize = 3;

/// How many recent sessions are scanned for the "recently cooked" list.
pub const RECENT_SESSION_WINDOW: usize = 10;

/// Fixed reply texts.
pub mod replies {
    use crate::domain::cooking::TasteStatus;

    pub const UNREGISTERED: &str =
        "まだ家族スペースに参加していません。\n招待リンクから参加してください。";
    pub const HINT: &str = "「開始」と送信して料理を始めましょう！";
    pub const SEASONING_ADDED: &str = "調味料入れましたね！👍";
    pub const COOKING_COMPLETE: &str = "🎉 お疲れさまでした！\n\n最後にいくつか教えてください。";
    pub const PHOTO_THANKS: &str = "📷 ありがとうございます！";
    pub const PHOTO_FAILED: &str = "写真の保存に失敗しました。もう一度送ってください。";
    pub const RECORDING_COMPLETE: &str =
        "✅ 記録完了しました！\n\nお子さんがWebで見られるようになりました。お疲れさまでした！";
    pub const RECORDING_SAVED: &str =
        "📝 記録を保存しました。\n\n必要な調味料がそろうと、お子さんがWebで見られるようになります。";
    pub const REPLY_SAVED: &str = "返信を保存しました ✅";

    pub fn taste(taste: TasteStatus) -> &'static str {
        match taste {
            TasteStatus::Thin => "薄めですね。調整のポイントとして記録しておきます📝",
            TasteStatus::Perfect => "ちょうどいい味付けですね！素晴らしい✨",
            TasteStatus::Thick => "濃いめですね。調整のポイントとして記録しておきます📝",
        }
    }

    /// Notification pushed to editors when a viewer comments.
    pub fn comment_notification(commenter: &str, dish_name: &str, content: &str) -> String {
        format!(
            "💬 {}さんが「{}」について質問しました：\n\n「{}」\n\nLINEで返信すると、コメントに追加されます。",
            commenter, dish_name, content
        )
    }
}

/// A selectable dish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishChoice {
    pub id: DishId,
    pub name: String,
}

/// Content of the dish picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishMenu {
    /// Most recent first, distinct.
    pub recent: Vec<DishChoice>,
    /// Most cooked first, ties in catalog order.
    pub frequent: Vec<DishChoice>,
    /// Every catalog dish in menu order.
    pub all: Vec<DishChoice>,
}

impl DishMenu {
    /// Builds the menu from a family's history.
    ///
    /// `recent_dishes` is ordered most recent first and may contain repeats;
    /// `dish_counts` holds historical session counts per dish. Dishes no
    /// longer in the catalog are dropped from both shortlists.
    pub fn build(
        catalog: &Catalog,
        recent_dishes: &[DishId],
        dish_counts: &[(DishId, i64)],
    ) -> Self {
        let choice = |id: &DishId| {
            catalog.dish(id).map(|d| DishChoice {
                id: d.id.clone(),
                name: d.name.clone(),
            })
        };

        let mut recent: Vec<DishChoice> = Vec::with_capacity(SHORTLIST_LEN);
        for id in recent_dishes.iter().take(RECENT_SESSION_WINDOW) {
            if recent.len() == SHORTLIST_LEN {
                break;
            }
            if recent.iter().any(|c| &c.id == id) {
                continue;
            }
            if let Some(c) = choice(id) {
                recent.push(c);
            }
        }

        let mut ranked: Vec<(usize, i64, &DishId)> = dish_counts
            .iter()
            .filter(|(_, count)| *count > 0)
            .filter_map(|(id, count)| catalog.dish_position(id).map(|pos| (pos, *count, id)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.dedup_by(|a, b| a.2 == b.2);
        let frequent = ranked
            .into_iter()
            .take(SHORTLIST_LEN)
            .filter_map(|(_, _, id)| choice(id))
            .collect();

        let all = catalog
            .dishes()
            .iter()
            .map(|d| DishChoice {
                id: d.id.clone(),
                name: d.name.clone(),
            })
            .collect();

        DishMenu {
            recent,
            frequent,
            all,
        }
    }
}

/// One quick-pick servings button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServingsChoice {
    pub label: String,
    pub value: i32,
}

/// The fixed servings quick-picks; the last one stands for "5 or more".
pub fn servings_choices() -> Vec<ServingsChoice> {
    vec![
        ServingsChoice { label: "2人".to_string(), value: 2 },
        ServingsChoice { label: "3人".to_string(), value: 3 },
        ServingsChoice { label: "4人".to_string(), value: 4 },
        ServingsChoice { label: "5人+".to_string(), value: 5 },
    ]
}

/// An interactive card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prompt {
    DishSelection { menu: DishMenu },
    /// Seasoning-added, three taste buttons and a completion button.
    CookingActions { dish_name: String },
    Servings { choices: Vec<ServingsChoice> },
    /// Link to the multi-select surface for the session.
    SeasoningPicker { session_id: SessionId, url: String },
    PhotoRequest { seasoning_name: String },
}

impl Prompt {
    pub fn dish_selection(menu: DishMenu) -> Self {
        Prompt::DishSelection { menu }
    }

    pub fn cooking_actions(dish_name: impl Into<String>) -> Self {
        Prompt::CookingActions {
            dish_name: dish_name.into(),
        }
    }

    pub fn servings() -> Self {
        Prompt::Servings {
            choices: servings_choices(),
        }
    }

    /// Mini-app link scoped to the session; the surface resolves the dish.
    pub fn seasoning_picker(liff_base_url: &str, session_id: SessionId) -> Self {
        Prompt::SeasoningPicker {
            session_id,
            url: format!(
                "{}/seasoning?session={}",
                liff_base_url.trim_end_matches('/'),
                session_id
            ),
        }
    }

    pub fn photo_request(seasoning_name: impl Into<String>) -> Self {
        Prompt::PhotoRequest {
            seasoning_name: seasoning_name.into(),
        }
    }
}

/// A message to deliver to a chat user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    Text { text: String },
    Prompt { prompt: Prompt },
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        OutboundMessage::Text { text: text.into() }
    }

    pub fn prompt(prompt: Prompt) -> Self {
        OutboundMessage::Prompt { prompt }
    }

    pub fn taste_reply(taste: TasteStatus) -> Self {
        Self::text(replies::taste(taste))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> DishId {
        DishId::new(s).unwrap()
    }

    fn ids(choices: &[DishChoice]) -> Vec<&str> {
        choices.iter().map(|c| c.id.as_str()).collect()
    }

    mod dish_menu {
        use super::*;

        #[test]
        fn lists_every_catalog_dish() {
            let catalog = Catalog::builtin().unwrap();
            let menu = DishMenu::build(&catalog, &[], &[]);
            assert_eq!(menu.all.len(), catalog.dishes().len());
            assert!(menu.recent.is_empty());
            assert!(menu.frequent.is_empty());
        }

        #[test]
        fn recent_is_distinct_most_recent_first_and_capped() {
            let catalog = Catalog::builtin().unwrap();
            let history = [
                id("curry"),
                id("curry"),
                id("misoshiru"),
                id("curry"),
                id("hamburg"),
                id("tonjiru"),
            ];
            let menu = DishMenu::build(&catalog, &history, &[]);
            assert_eq!(ids(&menu.recent), vec!["curry", "misoshiru", "hamburg"]);
        }

        #[test]
        fn recent_only_scans_last_ten_sessions() {
            let catalog = Catalog::builtin().unwrap();
            let mut history = vec![id("curry"); 10];
            history.push(id("hamburg"));
            let menu = DishMenu::build(&catalog, &history, &[]);
            assert_eq!(ids(&menu.recent), vec!["curry"]);
        }

        #[test]
        fn recent_skips_dishes_missing_from_catalog() {
            let catalog = Catalog::builtin().unwrap();
            let menu = DishMenu::build(&catalog, &[id("sushi"), id("curry")], &[]);
            assert_eq!(ids(&menu.recent), vec!["curry"]);
        }

        #[test]
        fn frequent_ranks_by_count_then_catalog_order() {
            let catalog = Catalog::builtin().unwrap();
            let counts = [
                (id("dashimaki"), 2),
                (id("curry"), 5),
                (id("misoshiru"), 2),
                (id("nikujaga"), 1),
            ];
            let menu = DishMenu::build(&catalog, &[], &counts);
            assert_eq!(ids(&menu.frequent), vec!["curry", "misoshiru", "dashimaki"]);
        }

        #[test]
        fn frequent_ignores_unknown_dishes() {
            let catalog = Catalog::builtin().unwrap();
            let counts = [(id("sushi"), 9), (id("curry"), 1)];
            let menu = DishMenu::build(&catalog, &[], &counts);
            assert_eq!(ids(&menu.frequent), vec!["curry"]);
        }
    }

    #[test]
    fn servings_offers_quick_picks_with_catch_all() {
        let values: Vec<i32> = servings_choices().iter().map(|c| c.value).collect();
        assert_eq!(values, vec![2, 3, 4, 5]);
        assert_eq!(servings_choices()[3].label, "5人+");
    }

    #[test]
    fn seasoning_picker_url_is_scoped_to_session() {
        let session_id = SessionId::new();
        let Prompt::SeasoningPicker { url, .. } =
            Prompt::seasoning_picker("https://liff.line.me/123/", session_id)
        else {
            panic!("expected seasoning picker");
        };
        assert_eq!(
            url,
            format!("https://liff.line.me/123/seasoning?session={}", session_id)
        );
    }

    #[test]
    fn comment_notification_names_commenter_and_dish() {
        let text = replies::comment_notification("Hana", "カレー", "How much roux?");
        assert!(text.contains("Hanaさん"));
        assert!(text.contains("「カレー」"));
        assert!(text.contains("How much roux?"));
    }
}
