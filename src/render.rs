//! HTML rendering of a [`Digest`].
//!
//! The document is a single self-contained HTML page suitable as an e-mail
//! body: inline styles only, movies first, then series sorted by name.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use tracing::error;

use crate::config::{Language, TemplateConfig};
use crate::digest::{summarize, Digest, MovieEntry, SeriesAggregate};

struct Labels {
    new_movies: &'static str,
    new_series: &'static str,
    added_on: &'static str,
    episodes: &'static str,
    summary: &'static str,
    footer: &'static str,
    unsubscribe: &'static str,
}

const EN: Labels = Labels {
    new_movies: "New movies",
    new_series: "New episodes",
    added_on: "Added on",
    episodes: "Episodes",
    summary: "movies and episodes were added recently",
    footer: "This newsletter was sent by",
    unsubscribe: "To unsubscribe, write to",
};

const FR: Labels = Labels {
    new_movies: "Nouveaux films",
    new_series: "Nouveaux épisodes",
    added_on: "Ajouté le",
    episodes: "Épisodes",
    summary: "films et épisodes ont été ajoutés récemment",
    footer: "Cette newsletter a été envoyée par",
    unsubscribe: "Pour vous désabonner, écrivez à",
};

fn labels(language: Language) -> &'static Labels {
    match language {
        Language::En => &EN,
        Language::Fr => &FR,
    }
}

/// Subject line with `{date}` replaced by the run date.
pub fn subject(template: &TemplateConfig, now: DateTime<Utc>) -> String {
    template
        .subject
        .replace("{date}", &now.format("%Y-%m-%d").to_string())
}

/// Episode ranges for display, e.g. `"1-3, 5"`.
///
/// Returns `None` (and logs) when an episode number is missing, so the
/// caller can leave the line out.
pub fn episode_ranges(series: &SeriesAggregate) -> Option<String> {
    match summarize(&series.episode_indices) {
        Ok(tokens) if tokens.is_empty() => None,
        Ok(tokens) => Some(tokens.join(", ")),
        Err(e) => {
            error!(
                series = %series.name,
                error = %e,
                "Episode list will not be displayed for this series"
            );
            None
        }
    }
}

/// Render the newsletter body.
pub fn render_newsletter(digest: &Digest, template: &TemplateConfig, now: DateTime<Utc>) -> String {
    let labels = labels(template.language);
    let mut html = String::with_capacity(8 * 1024);

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n\
         <body style=\"margin:0;padding:0;background:#101010;color:#e5e5e5;font-family:Arial,sans-serif;\">\n\
         <div style=\"max-width:680px;margin:0 auto;padding:24px;\">\n\
         <h1 style=\"color:#00a4dc;margin-bottom:4px;\">{title}</h1>\n",
        lang = match template.language {
            Language::En => "en",
            Language::Fr => "fr",
        },
        title = escape(&template.title),
    );
    if !template.subtitle.is_empty() {
        let _ = writeln!(
            html,
            "<p style=\"margin-top:0;color:#a0a0a0;\">{}</p>",
            escape(&template.subtitle)
        );
    }
    let _ = writeln!(
        html,
        "<p>{} {}</p>",
        digest.total_movies_scanned + digest.total_episodes_scanned,
        labels.summary
    );

    if !digest.movies.is_empty() {
        let _ = writeln!(html, "<h2>{}</h2>", labels.new_movies);
        let mut movies: Vec<&MovieEntry> = digest.movies.values().collect();
        movies.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        for movie in movies {
            let heading = match movie.year {
                Some(year) => format!("{} ({year})", escape(&movie.name)),
                None => escape(&movie.name),
            };
            let details = movie
                .created_on
                .map(|d| format!("{} {}", labels.added_on, d.format("%Y-%m-%d")))
                .into_iter()
                .collect();
            card(&mut html, &movie.poster_url, &heading, details, &movie.description);
        }
    }

    if !digest.series.is_empty() {
        let _ = writeln!(html, "<h2>{}</h2>", labels.new_series);
        let mut series: Vec<&SeriesAggregate> = digest.series.values().collect();
        series.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        for show in series {
            let heading = match show.year {
                Some(year) => format!("{} ({year})", escape(&show.name)),
                None => escape(&show.name),
            };
            let mut details = vec![escape(&show.seasons.join(", "))];
            if let Some(ranges) = episode_ranges(show) {
                details.push(format!("{} {}", labels.episodes, ranges));
            }
            if let Some(created) = show.created_on {
                details.push(format!("{} {}", labels.added_on, created.format("%Y-%m-%d")));
            }
            card(&mut html, &show.poster_url, &heading, details, &show.description);
        }
    }

    html.push_str("<hr style=\"border:none;border-top:1px solid #333;margin-top:32px;\">\n");
    html.push_str("<p style=\"font-size:12px;color:#808080;\">");
    if !template.jellyfin_owner_name.is_empty() {
        let _ = write!(
            html,
            "{} {}. ",
            labels.footer,
            escape(&template.jellyfin_owner_name)
        );
    }
    if !template.jellyfin_url.is_empty() {
        let url = escape(&template.jellyfin_url);
        let _ = write!(html, "<a href=\"{url}\" style=\"color:#00a4dc;\">{url}</a>. ");
    }
    if !template.unsubscribe_email.is_empty() {
        let email = escape(&template.unsubscribe_email);
        let _ = write!(
            html,
            "{} <a href=\"mailto:{email}\" style=\"color:#00a4dc;\">{email}</a>.",
            labels.unsubscribe
        );
    }
    let _ = write!(
        html,
        "</p>\n<!-- generated {} -->\n</div>\n</body>\n</html>\n",
        now.format("%Y-%m-%dT%H:%M:%SZ")
    );

    html
}

/// Append one poster + text block. `heading` and `details` are already escaped.
fn card(html: &mut String, poster: &str, heading: &str, details: Vec<String>, description: &str) {
    let _ = write!(
        html,
        "<table role=\"presentation\" style=\"width:100%;margin-bottom:20px;\"><tr>\n\
         <td style=\"width:120px;vertical-align:top;\"><img src=\"{poster}\" width=\"110\" alt=\"\" style=\"border-radius:6px;\"></td>\n\
         <td style=\"vertical-align:top;padding-left:12px;\">\n<h3 style=\"margin:0 0 6px 0;\">{heading}</h3>\n",
        poster = escape(poster),
    );
    for line in details {
        let _ = writeln!(
            html,
            "<div style=\"font-size:13px;color:#a0a0a0;\">{line}</div>"
        );
    }
    let _ = write!(
        html,
        "<p style=\"font-size:14px;\">{}</p>\n</td>\n</tr></table>\n",
        escape(description)
    );
}

/// Escape text for use in HTML element content and attribute values.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
