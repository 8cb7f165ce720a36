//! Server-to-client lines.
//!
//! The service speaks Ukrainian on the wire. Every line the server emits is
//! built here so handlers and tests agree on the exact text.

/// First line on every connection.
pub const NICK_PROMPT: &str = "Введіть свій нік у форматі: /nick ВашНік";
/// `/nick` with an empty or blank name.
pub const EMPTY_NICK: &str = "Нік не може бути порожнім. Спробуйте ще раз: /nick ВашНік";
/// Anything other than `/nick` before negotiation completes.
pub const NICK_REQUIRED: &str = "Спочатку задайте нік: /nick ВашНік";
/// The requested nickname belongs to a live session; the connection closes next.
pub const NICK_IN_USE: &str = "Такий нік вже використовується. Перепідключіться з іншим ніком.";
/// Acknowledges `/exit`.
pub const EXIT_ACK: &str = "Вихід з чату...";
/// Malformed `/pm`.
pub const PM_USAGE: &str = "Невірний формат /pm. Використання: /pm Ім'яКористувача повідомлення";
/// Flood protection tripped; the connection closes next.
pub const EXCESS_FLOOD: &str = "Забагато повідомлень. З'єднання закрито.";
/// Nickname negotiation took too long.
pub const NEGOTIATION_TIMEOUT: &str = "Час на вибір ніка вичерпано.";
/// No input within the idle window.
pub const IDLE_TIMEOUT: &str = "Відключено через неактивність.";
/// Sent to a recipient whose outbound queue overflowed.
pub const SENDQ_EXCEEDED: &str = "Відключено: черга повідомлень переповнена.";

/// Lines sent right after a nickname is accepted.
pub fn welcome(nick: &str) -> [String; 4] {
    [
        format!("Вітаємо у чаті, {nick}!"),
        "Команди:".to_string(),
        "  /pm Ім'яКористувача повідомлення  - приватне повідомлення".to_string(),
        "  /exit                             - вийти з чату".to_string(),
    ]
}

/// Announces a newcomer to everyone else.
pub fn joined(nick: &str) -> String {
    format!("*** {nick} приєднався до чату ***")
}

/// Announces a departure to everyone who remains.
pub fn departed(nick: &str) -> String {
    format!("*** {nick} вийшов з чату ***")
}

/// Public message as seen by recipients.
pub fn broadcast(sender: &str, body: &str) -> String {
    format!("{sender}: {body}")
}

/// Private message as delivered to its target.
pub fn pm_from(sender: &str, body: &str) -> String {
    format!("[PM від {sender}] {body}")
}

/// Confirmation echoed to the sender of a private message.
pub fn pm_to(target: &str, body: &str) -> String {
    format!("[PM до {target}] {body}")
}

/// `/pm` target not registered.
pub fn no_such_nick(target: &str) -> String {
    format!("Користувача з ніком '{target}' не знайдено.")
}

/// `/pm` target could not accept the message.
pub fn pm_failed(reason: &str) -> String {
    format!("Не вдалося відправити приватне повідомлення: {reason}")
}

/// `/nick` after the session already has a name.
pub fn already_named(nick: &str) -> String {
    format!("Нік вже встановлено: {nick}")
}
