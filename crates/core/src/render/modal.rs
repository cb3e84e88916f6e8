use crate::models::MediaPreview;

use super::html_escape;

const DEFAULT_TITLE: &str = "Preview";

/// Markup for the shared preview overlay.
///
/// Video wins over audio; audio is shown under its poster; anything else shows
/// the poster alone.
pub fn render_modal(preview: &MediaPreview) -> String {
    let title = if preview.title.is_empty() {
        DEFAULT_TITLE
    } else {
        preview.title.as_str()
    };
    let title = html_escape(title);

    let body = if !preview.video.is_empty() {
        format!(
            r#"<video src="{video}" controls autoplay playsinline></video>"#,
            video = html_escape(&preview.video),
        )
    } else if !preview.audio.is_empty() {
        format!(
            r#"{poster}<div class="modal-audio"><audio src="{audio}" controls autoplay></audio></div>"#,
            poster = poster_image(&preview.poster, &title),
            audio = html_escape(&preview.audio),
        )
    } else {
        poster_image(&preview.poster, &title)
    };

    format!(
        r#"<div class="modal-header"><h3 id="modalTitle">{title}</h3><button id="modalClose" type="button" aria-label="Close">&times;</button></div>
<div id="modalBody">{body}</div>"#
    )
}

fn poster_image(poster: &str, escaped_title: &str) -> String {
    format!(
        r#"<img src="{src}" alt="{alt}" loading="lazy" referrerpolicy="no-referrer">"#,
        src = html_escape(poster),
        alt = escaped_title,
    )
}
