//! Renders outbound messages into LINE Messaging API message objects.

use serde_json::{json, Value};

use crate::domain::conversation::{
    ButtonAction, CookingAction, DishChoice, DishMenu, OutboundMessage, Prompt,
};
use crate::domain::cooking::TasteStatus;

const MUTED: &str = "#888888";
const COMPLETE_GREEN: &str = "#00B900";

/// Converts one outbound message into a LINE message object.
pub fn render(message: &OutboundMessage) -> Value {
    match message {
        OutboundMessage::Text { text } => text_message(text),
        OutboundMessage::Prompt { prompt } => render_prompt(prompt),
    }
}

pub fn render_all(messages: &[OutboundMessage]) -> Vec<Value> {
    messages.iter().map(render).collect()
}

fn text_message(text: &str) -> Value {
    json!({ "type": "text", "text": text })
}

fn flex(alt_text: &str, bubble: Value) -> Value {
    json!({ "type": "flex", "altText": alt_text, "contents": bubble })
}

fn postback_button(label: &str, action: &ButtonAction, style: &str) -> Value {
    json!({
        "type": "button",
        "action": { "type": "postback", "label": label, "data": action.to_data() },
        "style": style,
    })
}

fn header(text: &str, size: &str) -> Value {
    json!({
        "type": "box",
        "layout": "vertical",
        "contents": [{ "type": "text", "text": text, "weight": "bold", "size": size }]
    })
}

fn render_prompt(prompt: &Prompt) -> Value {
    match prompt {
        Prompt::DishSelection { menu } => dish_selection(menu),
        Prompt::CookingActions { dish_name } => cooking_actions(dish_name),
        Prompt::Servings { choices } => {
            let buttons: Vec<Value> = choices
                .iter()
                .map(|c| {
                    let mut button = postback_button(
                        &c.label,
                        &ButtonAction::Servings(c.value),
                        "secondary",
                    );
                    button["flex"] = json!(1);
                    button
                })
                .collect();
            flex(
                "人数を選んでください",
                json!({
                    "type": "bubble",
                    "header": header("👨‍👩‍👧‍👦 何人分作りましたか？", "md"),
                    "body": {
                        "type": "box",
                        "layout": "horizontal",
                        "spacing": "sm",
                        "contents": buttons
                    }
                }),
            )
        }
        Prompt::SeasoningPicker { url, .. } => flex(
            "調味料を選んでください",
            json!({
                "type": "bubble",
                "body": {
                    "type": "box",
                    "layout": "vertical",
                    "contents": [
                        { "type": "text", "text": "🧂 使った調味料を選んでください", "weight": "bold", "size": "md" },
                        { "type": "text", "text": "複数選択できます", "size": "sm", "color": MUTED, "margin": "sm" }
                    ]
                },
                "footer": {
                    "type": "box",
                    "layout": "vertical",
                    "contents": [{
                        "type": "button",
                        "action": { "type": "uri", "label": "調味料を選ぶ", "uri": url },
                        "style": "primary"
                    }]
                }
            }),
        ),
        Prompt::PhotoRequest { seasoning_name } => text_message(&format!(
            "📷 {name}の写真を送ってください\n\n使った{name}のパッケージやボトルを撮影してください。",
            name = seasoning_name
        )),
    }
}

fn dish_buttons(dishes: &[DishChoice], prefix: &str, style: &str) -> Vec<Value> {
    dishes
        .iter()
        .map(|d| {
            let mut button = postback_button(
                &format!("{}{}", prefix, d.name),
                &ButtonAction::SelectDish(d.id.clone()),
                style,
            );
            button["height"] = json!("sm");
            button
        })
        .collect()
}

fn section(title: &str, buttons: Vec<Value>) -> [Value; 2] {
    [
        json!({ "type": "text", "text": title, "size": "sm", "color": MUTED }),
        json!({ "type": "box", "layout": "vertical", "spacing": "sm", "contents": buttons }),
    ]
}

fn dish_selection(menu: &DishMenu) -> Value {
    let mut body: Vec<Value> = Vec::new();
    let separator = json!({ "type": "separator", "margin": "md" });

    if !menu.recent.is_empty() {
        body.extend(section("最近作った料理", dish_buttons(&menu.recent, "🕐 ", "secondary")));
        body.push(separator.clone());
    }
    if !menu.frequent.is_empty() {
        body.extend(section("よく作る料理", dish_buttons(&menu.frequent, "⭐ ", "secondary")));
        body.push(separator);
    }
    body.extend(section("定番メニュー", dish_buttons(&menu.all, "", "primary")));

    flex(
        "料理を選んでください",
        json!({
            "type": "bubble",
            "header": header("🍳 今日は何を作りますか？", "lg"),
            "body": { "type": "box", "layout": "vertical", "spacing": "md", "contents": body }
        }),
    )
}

fn cooking_actions(dish_name: &str) -> Value {
    let taste = |label: &str, taste: TasteStatus, style: &str| {
        let mut button = postback_button(
            label,
            &ButtonAction::Cooking(CookingAction::Taste(taste)),
            style,
        );
        button["flex"] = json!(1);
        button
    };
    let mut complete = postback_button(
        "✅ 完成！",
        &ButtonAction::Cooking(CookingAction::Complete),
        "primary",
    );
    complete["color"] = json!(COMPLETE_GREEN);

    flex(
        "調理中のアクション",
        json!({
            "type": "bubble",
            "header": header(&format!("🍳 {}を作っています", dish_name), "md"),
            "body": {
                "type": "box",
                "layout": "vertical",
                "spacing": "md",
                "contents": [
                    postback_button(
                        "🧂 調味料入れた",
                        &ButtonAction::Cooking(CookingAction::SeasoningAdded),
                        "secondary",
                    ),
                    {
                        "type": "box",
                        "layout": "horizontal",
                        "spacing": "sm",
                        "contents": [
                            taste("薄い", TasteStatus::Thin, "secondary"),
                            taste("ちょうど", TasteStatus::Perfect, "primary"),
                            taste("濃い", TasteStatus::Thick, "secondary"),
                        ]
                    },
                    complete,
                ]
            }
        }),
    )
}
