//! Button-driven paginated embed menus.
//!
//! A [`PageSource`] knows how many pages it has and how to render one of them; a
//! [`BaseMenu`] sends the first page with a row of navigation buttons and keeps
//! answering button presses until it is stopped or times out.

use std::time::Duration;

use async_trait::async_trait;
use poise::{
    CreateReply,
    serenity_prelude::{
        ButtonStyle, ComponentInteraction, ComponentInteractionCollector, CreateActionRow,
        CreateButton, CreateEmbed, CreateEmbedFooter, CreateInteractionResponse,
        CreateInteractionResponseMessage, MessageFlags, ReactionType, UserId,
    },
};
use tracing::{debug, warn};

use crate::{CommandResult, Context, Error};

/// Default inactivity timeout of a menu.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

/// The content of one rendered page.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub content: Option<String>,
    pub embeds: Vec<CreateEmbed>,
}

impl Page {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embeds: Vec::new(),
        }
    }

    pub fn embeds(embeds: Vec<CreateEmbed>) -> Self {
        Self {
            content: None,
            embeds,
        }
    }

    /// Builds a reply carrying this page and the given component rows.
    pub fn to_reply(&self, components: Vec<CreateActionRow>) -> CreateReply {
        let mut reply = CreateReply::default().components(components);
        if let Some(content) = &self.content {
            reply = reply.content(content.clone());
        }
        for embed in &self.embeds {
            reply = reply.embed(embed.clone());
        }
        reply
    }

    fn to_response(&self, components: Vec<CreateActionRow>) -> CreateInteractionResponse {
        let mut message = CreateInteractionResponseMessage::new()
            .embeds(self.embeds.clone())
            .components(components);
        if let Some(content) = &self.content {
            message = message.content(content.clone());
        }
        CreateInteractionResponse::UpdateMessage(message)
    }
}

impl From<CreateEmbed> for Page {
    fn from(embed: CreateEmbed) -> Self {
        Self::embeds(vec![embed])
    }
}

/// Where a page sits inside a running menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePosition {
    /// Zero-based index of the page being shown.
    pub current: usize,
    pub max: usize,
}

impl PagePosition {
    pub fn footer_text(&self) -> String {
        format!("Page {}/{}", self.current + 1, self.max)
    }

    pub fn footer(&self) -> CreateEmbedFooter {
        CreateEmbedFooter::new(self.footer_text())
    }
}

/// A list split into fixed-size pages.
#[derive(Debug, Clone)]
pub struct ListPageSource<T> {
    entries: Vec<T>,
    per_page: usize,
}

impl<T> ListPageSource<T> {
    pub fn new(entries: Vec<T>, per_page: usize) -> Self {
        Self {
            entries,
            per_page: per_page.max(1),
        }
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    pub fn per_page(&self) -> usize {
        self.per_page
    }

    pub fn max_pages(&self) -> usize {
        self.entries.len().div_ceil(self.per_page)
    }

    pub fn is_paginating(&self) -> bool {
        self.entries.len() > self.per_page
    }

    /// The entries on page `page`, or `None` past the end.
    pub fn get_page(&self, page: usize) -> Option<&[T]> {
        let start = page.checked_mul(self.per_page)?;
        if start >= self.entries.len() {
            return None;
        }
        let end = (start + self.per_page).min(self.entries.len());
        Some(&self.entries[start..end])
    }

    /// Single-entry access for sources with one entry per page.
    pub fn get_entry(&self, page: usize) -> Option<&T> {
        self.get_page(page).and_then(|entries| entries.first())
    }
}

/// Returned by sources asked for a page past their end.
#[derive(thiserror::Error, Debug)]
#[error("Page {0} does not exist")]
pub struct MissingPage(pub usize);

/// Something a [`BaseMenu`] can page through.
#[async_trait]
pub trait PageSource: Send + Sync {
    fn max_pages(&self) -> usize;

    fn is_paginating(&self) -> bool {
        self.max_pages() > 1
    }

    /// Renders page `page`. `position` is `None` when the page is shown outside a menu.
    async fn format_page(&self, page: usize, position: Option<PagePosition>) -> Result<Page, Error>;
}

/// The buttons of a menu, in the order they are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuButton {
    Stop,
    First,
    Back,
    Forward,
    Last,
}

impl MenuButton {
    pub const ALL: [MenuButton; 5] = [
        MenuButton::Stop,
        MenuButton::First,
        MenuButton::Back,
        MenuButton::Forward,
        MenuButton::Last,
    ];

    fn key(self) -> &'static str {
        match self {
            MenuButton::Stop => "stop",
            MenuButton::First => "first",
            MenuButton::Back => "back",
            MenuButton::Forward => "forward",
            MenuButton::Last => "last",
        }
    }

    fn emoji(self) -> &'static str {
        match self {
            MenuButton::Stop => "✖️",
            MenuButton::First => "⏮️",
            MenuButton::Back => "◀️",
            MenuButton::Forward => "▶️",
            MenuButton::Last => "⏭️",
        }
    }

    fn style(self) -> ButtonStyle {
        match self {
            MenuButton::Stop => ButtonStyle::Danger,
            _ => ButtonStyle::Secondary,
        }
    }

    pub fn custom_id(self, menu_id: u64) -> String {
        format!("{}_menu_{}", menu_id, self.key())
    }

    /// Parses a custom id produced by [`MenuButton::custom_id`] for the same menu.
    pub fn from_custom_id(menu_id: u64, custom_id: &str) -> Option<Self> {
        let key = custom_id.strip_prefix(&format!("{}_menu_", menu_id))?;
        Self::ALL.into_iter().find(|button| button.key() == key)
    }
}

/// Resolves a requested page number the way forward/back do: wrapping past either end.
pub fn checked_page(requested: isize, max_pages: usize) -> usize {
    if max_pages == 0 {
        return 0;
    }
    if requested < 0 {
        max_pages - 1
    } else if requested as usize >= max_pages {
        0
    } else {
        requested as usize
    }
}

/// Creates the navigation row. Navigation is disabled when there is only one page.
pub fn menu_buttons(menu_id: u64, paginating: bool) -> Vec<CreateActionRow> {
    let buttons = MenuButton::ALL
        .into_iter()
        .map(|button| {
            CreateButton::new(button.custom_id(menu_id))
                .emoji(ReactionType::Unicode(button.emoji().to_string()))
                .style(button.style())
                .disabled(button != MenuButton::Stop && !paginating)
        })
        .collect();

    vec![CreateActionRow::Buttons(buttons)]
}

/// What the menu saw while waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEvent<'a> {
    Press { custom_id: &'a str, authorized: bool },
    Timeout,
}

/// How the menu answers a [`MenuEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Render this page and make it current.
    Goto(usize),
    Stop,
    /// The presser may not drive this menu; tell them so, privately.
    Reject,
    /// Not one of this menu's buttons.
    Ignore,
    /// Timed out; keep the page and strip the buttons.
    Close,
}

/// How a stopped menu leaves its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopAction {
    Delete,
    StripButtons,
}

/// Ephemeral messages cannot be deleted, only edited.
pub fn stop_action(ephemeral: bool) -> StopAction {
    if ephemeral {
        StopAction::StripButtons
    } else {
        StopAction::Delete
    }
}

pub fn next_action(menu_id: u64, current: usize, max_pages: usize, event: MenuEvent<'_>) -> MenuAction {
    let (custom_id, authorized) = match event {
        MenuEvent::Timeout => return MenuAction::Close,
        MenuEvent::Press {
            custom_id,
            authorized,
        } => (custom_id, authorized),
    };
    if !authorized {
        return MenuAction::Reject;
    }

    match MenuButton::from_custom_id(menu_id, custom_id) {
        None => MenuAction::Ignore,
        Some(MenuButton::Stop) => MenuAction::Stop,
        Some(MenuButton::First) => MenuAction::Goto(0),
        Some(MenuButton::Last) => MenuAction::Goto(max_pages.saturating_sub(1)),
        Some(MenuButton::Back) => MenuAction::Goto(checked_page(current as isize - 1, max_pages)),
        Some(MenuButton::Forward) => MenuAction::Goto(checked_page(current as isize + 1, max_pages)),
    }
}

/// An interactive paginated message.
pub struct BaseMenu<S> {
    source: S,
    page_start: usize,
    current_page: usize,
    timeout: Duration,
    ephemeral: bool,
}

impl<S: PageSource> BaseMenu<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            page_start: 0,
            current_page: 0,
            timeout: DEFAULT_TIMEOUT,
            ephemeral: false,
        }
    }

    pub fn page_start(mut self, page_start: usize) -> Self {
        self.page_start = page_start;
        self.current_page = page_start;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    async fn render(&self, page: usize) -> Result<Page, Error> {
        let position = PagePosition {
            current: page,
            max: self.source.max_pages(),
        };
        self.source.format_page(page, Some(position)).await
    }

    fn is_authorized(ctx: Context<'_>, user: UserId) -> bool {
        user == ctx.author().id || ctx.framework().options().owners.contains(&user)
    }

    /// Renders `page` and makes it current. A failed render leaves the current page as it was.
    pub async fn show(&mut self, page: usize) -> Result<Page, Error> {
        let rendered = self.render(page).await?;
        self.current_page = page;
        Ok(rendered)
    }

    /// Sends the starting page and handles button presses until stopped or timed out.
    pub async fn start(mut self, ctx: Context<'_>) -> CommandResult {
        let menu_id = ctx.id();
        let mut page = self.show(self.page_start).await?;

        let buttons = menu_buttons(menu_id, self.source.is_paginating());
        let reply = ctx
            .send(page.to_reply(buttons).ephemeral(self.ephemeral))
            .await?;

        loop {
            let prefix = format!("{}_menu_", menu_id);
            let press = ComponentInteractionCollector::new(ctx)
                .filter(move |press| press.data.custom_id.starts_with(&prefix))
                .timeout(self.timeout)
                .await;

            let event = match &press {
                Some(press) => MenuEvent::Press {
                    custom_id: &press.data.custom_id,
                    authorized: Self::is_authorized(ctx, press.user.id),
                },
                None => MenuEvent::Timeout,
            };
            let action = next_action(menu_id, self.current_page, self.source.max_pages(), event);

            let Some(press) = press else {
                debug!("Menu {} timed out on page {}", menu_id, self.current_page);
                reply.edit(ctx, page.to_reply(Vec::new())).await?;
                return Ok(());
            };

            let target = match action {
                MenuAction::Goto(target) => target,
                MenuAction::Ignore | MenuAction::Close => continue,
                MenuAction::Reject => {
                    press
                        .create_response(
                            ctx,
                            CreateInteractionResponse::Message(
                                CreateInteractionResponseMessage::new()
                                    .content("You are not authorized to interact with this.")
                                    .ephemeral(true),
                            ),
                        )
                        .await?;
                    continue;
                }
                MenuAction::Stop => {
                    self.stop(ctx, &press, &page).await?;
                    return Ok(());
                }
            };

            match self.show(target).await {
                Ok(rendered) => {
                    page = rendered;
                    let buttons = menu_buttons(menu_id, self.source.is_paginating());
                    press.create_response(ctx, page.to_response(buttons)).await?;
                }
                Err(e) => {
                    warn!("Menu {} could not render page {}: {}", menu_id, target, e);
                    press
                        .create_response(
                            ctx,
                            CreateInteractionResponse::Message(
                                CreateInteractionResponseMessage::new()
                                    .content(format!("Unable to show that page: {}", e))
                                    .ephemeral(true),
                            ),
                        )
                        .await?;
                }
            }
        }
    }

    async fn stop(&self, ctx: Context<'_>, press: &ComponentInteraction, page: &Page) -> CommandResult {
        let ephemeral = press
            .message
            .flags
            .is_some_and(|flags| flags.contains(MessageFlags::EPHEMERAL));

        match stop_action(ephemeral) {
            StopAction::StripButtons => {
                press.create_response(ctx, page.to_response(Vec::new())).await?;
            }
            StopAction::Delete => {
                press
                    .create_response(ctx, CreateInteractionResponse::Acknowledge)
                    .await?;
                press.message.delete(ctx).await?;
            }
        }
        Ok(())
    }
}
