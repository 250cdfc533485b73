//! User-facing texts, keyboards and cards.

use crate::config::GateSettings;
use crate::reply::{Button, CallbackAction, InlineKeyboard, ReplyCard};
use chrono::{DateTime, TimeZone};
use std::fmt::Display;

// ─────────────────────────────────────────────────────────────────────────────
// Trait definition
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for bot view rendering
///
/// Provides all text messages shown to users.
pub trait GateView {
    /// Caption of the /start card for subscribed users
    fn welcome_subscribed() -> &'static str;

    /// Caption of the /start card for users outside the channel
    fn subscribe_prompt() -> &'static str;

    /// Label of the "shorten a link" button
    fn shorten_button() -> &'static str;

    /// Label of the channel link button
    fn subscribe_button() -> &'static str;

    /// Label of the "I subscribed" button
    fn check_subscription_button() -> &'static str;

    /// New caption after a successful re-check
    fn subscription_confirmed() -> &'static str;

    /// Alert when the re-check still finds no subscription
    fn subscription_not_found() -> &'static str;

    /// Toast after pressing "shorten a link"
    fn shorten_hint() -> &'static str;

    /// Reply to a link from a user outside the channel
    fn subscription_required() -> &'static str;

    /// Reply to text that is not a link
    fn not_a_link() -> &'static str;

    /// Interim reply while the shortener is called
    fn shortening_in_progress() -> &'static str;

    /// Successful result
    fn shortened(short_url: &str, original_url: &str) -> String;

    /// The shortener answered with something that is not a short link
    fn shorten_failed() -> &'static str;

    /// The shortener call itself failed
    fn shorten_error() -> &'static str;

    /// /admin from anyone but the admin
    fn access_denied() -> &'static str;

    /// /admin report
    fn admin_report<Tz>(user_count: usize, channel_id: i64, now: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display;
}

// ─────────────────────────────────────────────────────────────────────────────
// Default implementation
// ─────────────────────────────────────────────────────────────────────────────

/// Default Russian-language implementation of `GateView`
pub struct DefaultGateView;

impl GateView for DefaultGateView {
    fn welcome_subscribed() -> &'static str {
        "🎉 Добро пожаловать в ShortLink Bot!

Что умеет этот бот:
• Мгновенно сокращает любые длинные ссылки
• Работает бесплатно и без рекламы
• Просто пришли ссылку — получи короткую 🔥

Пример: https://www.youtube.com/watch?v=dQw4w9WgXcQ

Админ-панель (только для тебя): /admin"
    }

    fn subscribe_prompt() -> &'static str {
        "🔒 Чтобы пользоваться ботом, подпишись на канал!

После подписки нажми \"Я подписался\" или напиши /start заново 👇"
    }

    fn shorten_button() -> &'static str {
        "🔗 Сократить ссылку"
    }

    fn subscribe_button() -> &'static str {
        "📢 Подписаться на канал"
    }

    fn check_subscription_button() -> &'static str {
        "✅ Я подписался"
    }

    fn subscription_confirmed() -> &'static str {
        "Отлично! Теперь можешь сокращать ссылки 🔥

Просто пришли мне любую длинную ссылку!"
    }

    fn subscription_not_found() -> &'static str {
        "Подписка не найдена 😕 Проверь канал"
    }

    fn shorten_hint() -> &'static str {
        "Пришли мне длинную ссылку одним сообщением 👇"
    }

    fn subscription_required() -> &'static str {
        "🚫 Подпишись на канал, чтобы использовать бота!"
    }

    fn not_a_link() -> &'static str {
        "Это не похоже на ссылку 😅\nПришли нормальную ссылку."
    }

    fn shortening_in_progress() -> &'static str {
        "Сокращаю... ⏳"
    }

    fn shortened(short_url: &str, original_url: &str) -> String {
        format!(
            "Готово! 🔥\n\n\
            Короткая ссылка: {short_url}\n\
            Оригинал: {original_url}\n\n\
            Пришли ещё одну, если хочешь!"
        )
    }

    fn shorten_failed() -> &'static str {
        "Не получилось сократить 😔\nПопробуй другую ссылку."
    }

    fn shorten_error() -> &'static str {
        "Ошибка при сокращении 😢\nПопробуй позже."
    }

    fn access_denied() -> &'static str {
        "Доступ запрещён 😈"
    }

    fn admin_report<Tz>(user_count: usize, channel_id: i64, now: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        format!(
            "📊 Админ-панель\n\n\
            Уникальных пользователей: {user_count}\n\
            Канал: {channel_id}\n\
            Бот онлайн: {}\n\n\
            Статистика обновляется при каждом /start",
            now.format("%d.%m.%Y, %H:%M:%S")
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cards and keyboards
// ─────────────────────────────────────────────────────────────────────────────

/// Keyboard for subscribed users: one button starting the shorten flow
#[must_use]
pub fn subscribed_keyboard() -> InlineKeyboard {
    InlineKeyboard::new(vec![vec![Button::callback(
        DefaultGateView::shorten_button(),
        CallbackAction::Shorten,
    )]])
}

/// Keyboard for users outside the channel: channel link, then re-check
#[must_use]
pub fn subscribe_keyboard(invite_link: &str) -> InlineKeyboard {
    InlineKeyboard::new(vec![
        vec![Button::url(DefaultGateView::subscribe_button(), invite_link)],
        vec![Button::callback(
            DefaultGateView::check_subscription_button(),
            CallbackAction::CheckSubscription,
        )],
    ])
}

/// The /start card for either side of the subscription gate
#[must_use]
pub fn welcome_card(settings: &GateSettings, subscribed: bool) -> ReplyCard {
    let (caption, keyboard) = if subscribed {
        (DefaultGateView::welcome_subscribed(), subscribed_keyboard())
    } else {
        (
            DefaultGateView::subscribe_prompt(),
            subscribe_keyboard(&settings.invite_link),
        )
    };

    ReplyCard {
        image: settings.welcome_image_url.clone(),
        caption: caption.to_string(),
        keyboard,
    }
}
