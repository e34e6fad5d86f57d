/// Player command bound to a key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum KeyCommand {
    TogglePlay,
    ToggleMute,
    SeekBackward,
    SeekForward,
    VolumeUp,
    VolumeDown,
    PictureInPicture,
    ToggleFullscreen,
    /// Show the first subtitle track, or hide subtitles if shown.
    ToggleSubtitles,
    NextAudioTrack,
    /// Close the open menu if one, the player otherwise.
    Close,
    /// Jump to the given tenth of the content.
    JumpToTenth(u8),
}

/// Translate a `KeyboardEvent.key` value into a `KeyCommand`.
///
/// Returns `None` for unbound keys, and for every key when the focus is in an editable
/// element (`in_editable`), which keeps its default behavior.
pub(crate) fn map_key(key: &str, in_editable: bool) -> Option<KeyCommand> {
    if in_editable {
        return None;
    }
    let command = match key {
        " " | "Spacebar" | "k" | "K" => KeyCommand::TogglePlay,
        "m" | "M" => KeyCommand::ToggleMute,
        "ArrowLeft" | "Left" => KeyCommand::SeekBackward,
        "ArrowRight" | "Right" => KeyCommand::SeekForward,
        "ArrowUp" | "Up" => KeyCommand::VolumeUp,
        "ArrowDown" | "Down" => KeyCommand::VolumeDown,
        "p" | "P" => KeyCommand::PictureInPicture,
        "f" | "F" => KeyCommand::ToggleFullscreen,
        "c" | "C" => KeyCommand::ToggleSubtitles,
        "a" | "A" => KeyCommand::NextAudioTrack,
        "Escape" | "Esc" => KeyCommand::Close,
        _ => {
            let mut chars = key.chars();
            match (chars.next().and_then(|c| c.to_digit(10)), chars.next()) {
                (Some(digit), None) => KeyCommand::JumpToTenth(digit as u8),
                _ => return None,
            }
        }
    };
    Some(command)
}
