use crate::{
    browser::{ResultsView, SavedView},
    recipe::RecipeRecord,
};

/// Telegram rejects messages longer than this.
pub const MAX_MESSAGE_CHARS: usize = 4096;
const MAX_INSTRUCTIONS_CHARS: usize = 2500;

pub const NO_SAVED_RECIPES: &str = "No saved recipes found";

static SPECIAL_CHARACTERS: [char; 19] = [
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    '\\',
];

pub fn escape_markdown(str: &str) -> String {
    let mut new_str = String::with_capacity(str.len());
    for c in str.chars() {
        if SPECIAL_CHARACTERS.contains(&c) {
            new_str.push('\\');
        }
        new_str.push(c)
    }
    new_str
}

// Inside inline link URLs only `)` and `\` need escaping.
fn escape_link(url: &str) -> String {
    url.replace('\\', "\\\\").replace(')', "\\)")
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

pub fn no_results(query: &str) -> String {
    format!("No results for {query}")
}

/// One MarkdownV2 card. `number` is the handle used by `/save`.
pub fn recipe_card(number: Option<usize>, recipe: &RecipeRecord) -> String {
    let mut card = String::new();

    if let Some(number) = number {
        card.push_str(&format!("{}\\. ", number));
    }
    card.push_str(&format!("*{}*", escape_markdown(&recipe.name)));
    for tag in [&recipe.category, &recipe.area].into_iter().flatten() {
        card.push_str(&format!(" \\#{}", escape_markdown(&tag.replace(' ', "_"))));
    }

    card.push_str("\n\n*Ingredients*\n");
    for ingredient in &recipe.ingredients {
        let measure = &ingredient.measure;
        if measure.is_empty() {
            card.push_str(&format!("• {}\n", escape_markdown(&ingredient.ingredient)));
        } else {
            card.push_str(&format!(
                "• *{}* {}\n",
                escape_markdown(measure),
                escape_markdown(&ingredient.ingredient)
            ));
        }
    }

    if let Some(instructions) = &recipe.instructions {
        card.push_str("\n*Instructions*\n");
        card.push_str(&escape_markdown(&truncate(instructions, MAX_INSTRUCTIONS_CHARS)));
        card.push('\n');
    }

    let links: Vec<String> = [("Video", &recipe.video_url), ("Source", &recipe.source_url)]
        .into_iter()
        .filter_map(|(label, url)| {
            url.as_ref()
                .map(|url| format!("[{label}]({})", escape_link(url)))
        })
        .collect();
    if !links.is_empty() {
        card.push('\n');
        card.push_str(&links.join(" \\| "));
    }

    card
}

/// Messages for the search results: one card per recipe, numbered for `/save`.
pub fn results_messages(view: &ResultsView<'_>) -> Vec<String> {
    match view {
        ResultsView::NoResults { query } => vec![escape_markdown(&no_results(query))],
        ResultsView::Recipes(recipes) => {
            let mut messages: Vec<String> = recipes
                .iter()
                .enumerate()
                .map(|(i, recipe)| recipe_card(Some(i + 1), recipe))
                .collect();
            messages.push(escape_markdown("/save <number> to keep one, /saved to see your collection"));
            messages
        }
    }
}

pub fn saved_messages(view: &SavedView<'_>) -> Vec<String> {
    match view {
        SavedView::Empty => vec![escape_markdown(NO_SAVED_RECIPES)],
        SavedView::Recipes(recipes) => {
            let mut messages = vec![format!("*Saved recipes* \\({}\\)", recipes.len())];
            messages.extend(recipes.iter().map(|recipe| recipe_card(None, recipe)));
            messages
        }
    }
}
