use std::sync::Arc;

use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::types::{InputFile, ParseMode};
use teloxide::{prelude::*, utils::command::BotCommands};

use crate::{
    browser::{Browser, BrowserState, ResultsView},
    config::BrowserConfig,
    error::BrowserError,
    recipe::RecipeRecord,
    render,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;
type MyDialogue = Dialogue<BrowserState, InMemStorage<BrowserState>>;

#[derive(BotCommands, Clone)]
#[command(
    rename_rule = "lowercase",
    description = "These commands are supported:"
)]
pub enum Command {
    #[command(description = "Display this text.")]
    Help,
    #[command(description = "Search for the default recipe.")]
    Start,
    #[command(description = "Search recipes by name, e.g. /search Arrabiata. Without a term, repeats the last search.")]
    Search(String),
    #[command(description = "Save a search result by its number, e.g. /save 1.")]
    Save(String),
    #[command(description = "Show your saved recipes.")]
    Saved,
}

/// Settings shared by every handler.
pub struct Settings {
    pub default_query: String,
}

pub async fn run(config: BrowserConfig, browser: Browser) {
    let bot = Bot::from_env();
    let settings = Settings {
        default_query: config.default_query,
    };

    let handler = Update::filter_message()
        .filter_command::<Command>()
        .enter_dialogue::<Message, InMemStorage<BrowserState>, BrowserState>()
        .branch(dptree::case![Command::Help].endpoint(help))
        .branch(dptree::case![Command::Start].endpoint(start))
        .branch(dptree::case![Command::Search(query)].endpoint(search))
        .branch(dptree::case![Command::Save(number)].endpoint(save))
        .branch(dptree::case![Command::Saved].endpoint(show_saved));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![
            Arc::new(browser),
            Arc::new(settings),
            InMemStorage::<BrowserState>::new()
        ])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

async fn help(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

async fn start(
    bot: Bot,
    dialogue: MyDialogue,
    browser: Arc<Browser>,
    settings: Arc<Settings>,
    msg: Message,
    state: BrowserState,
) -> HandlerResult {
    let state = state.with_query(&settings.default_query);
    run_search(bot, dialogue, browser, msg, state).await
}

async fn search(
    bot: Bot,
    dialogue: MyDialogue,
    browser: Arc<Browser>,
    msg: Message,
    state: BrowserState,
    query: String,
) -> HandlerResult {
    let state = if query.trim().is_empty() {
        state
    } else {
        state.with_query(&query)
    };
    if state.query.is_empty() {
        bot.send_message(msg.chat.id, "Tell me what to look for, e.g. /search Arrabiata")
            .await?;
        return Ok(());
    }
    run_search(bot, dialogue, browser, msg, state).await
}

async fn run_search(
    bot: Bot,
    dialogue: MyDialogue,
    browser: Arc<Browser>,
    msg: Message,
    state: BrowserState,
) -> HandlerResult {
    let (state, ticket) = state.begin_search();
    dialogue.update(state.clone()).await?;

    let recipes = match browser.find(&state.query).await {
        Ok(recipes) => recipes,
        Err(_) => {
            bot.send_message(
                msg.chat.id,
                format!("Could not search for {} right now, try again later.", state.query),
            )
            .await?;
            return Ok(());
        }
    };

    // Results of a superseded search are neither applied nor shown.
    let latest = dialogue.get().await?.unwrap_or(state);
    if !latest.is_current(ticket) {
        return Ok(());
    }
    let latest = latest.apply_search_results(ticket, recipes);

    let view = latest.results_view();
    let photos: Vec<&RecipeRecord> = match &view {
        ResultsView::Recipes(recipes) => recipes.iter().collect(),
        ResultsView::NoResults { .. } => Vec::new(),
    };
    send_cards(&bot, msg.chat.id, &photos, render::results_messages(&view)).await?;

    dialogue.update(latest).await?;
    Ok(())
}

async fn save(
    bot: Bot,
    dialogue: MyDialogue,
    browser: Arc<Browser>,
    msg: Message,
    state: BrowserState,
    number: String,
) -> HandlerResult {
    let Ok(number) = number.trim().parse::<usize>() else {
        bot.send_message(msg.chat.id, "Use /save <number> with a number from the search results.")
            .await?;
        return Ok(());
    };

    match browser.save_result(&state, number).await {
        Ok(state) => {
            bot.send_message(msg.chat.id, "Recipe saved.").await?;
            send_saved(&bot, msg.chat.id, &state).await?;
            dialogue.update(state).await?;
        }
        Err(BrowserError::NoSuchResult(number)) => {
            bot.send_message(msg.chat.id, format!("There is no search result number {number}."))
                .await?;
        }
        Err(_) => {
            bot.send_message(msg.chat.id, "Could not save the recipe, try again later.")
                .await?;
        }
    }
    Ok(())
}

async fn show_saved(
    bot: Bot,
    dialogue: MyDialogue,
    browser: Arc<Browser>,
    msg: Message,
    state: BrowserState,
) -> HandlerResult {
    match browser.load_saved(&state).await {
        Ok(state) => {
            send_saved(&bot, msg.chat.id, &state).await?;
            dialogue.update(state).await?;
        }
        Err(_) => {
            bot.send_message(msg.chat.id, "Could not fetch your saved recipes, try again later.")
                .await?;
        }
    }
    Ok(())
}

async fn send_saved(bot: &Bot, chat_id: ChatId, state: &BrowserState) -> HandlerResult {
    for text in render::saved_messages(&state.saved_view()) {
        send_markdown(bot, chat_id, text).await?;
    }
    Ok(())
}

/// Sends each recipe's picture followed by its card. `texts` may hold trailing
/// messages without a matching recipe.
async fn send_cards(
    bot: &Bot,
    chat_id: ChatId,
    recipes: &[&RecipeRecord],
    texts: Vec<String>,
) -> HandlerResult {
    for (i, text) in texts.into_iter().enumerate() {
        if let Some(url) = recipes.get(i).and_then(|r| r.image_url.as_deref()) {
            match reqwest::Url::parse(url) {
                Ok(url) => {
                    if let Err(e) = bot.send_photo(chat_id, InputFile::url(url)).await {
                        log::warn!("Failed to send recipe picture: {e}");
                    }
                }
                Err(e) => log::warn!("Invalid recipe picture url {url:?}: {e}"),
            }
        }
        send_markdown(bot, chat_id, text).await?;
    }
    Ok(())
}

async fn send_markdown(bot: &Bot, chat_id: ChatId, text: String) -> HandlerResult {
    bot.send_message(chat_id, text)
        .parse_mode(ParseMode::MarkdownV2)
        .await?;
    Ok(())
}
