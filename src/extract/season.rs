//! Season dropdown and episode list fragments from the AJAX endpoints.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::field::{leading_number, selector, text_of, Field};
use crate::model::{Episode, Season};

static SEASON: LazyLock<Selector> = LazyLock::new(|| selector(".dropdown-item.ss-item"));
static EPISODE: LazyLock<Selector> = LazyLock::new(|| selector(".nav-item .eps-item"));

const SEASON_PREFIX: &str = "Season ";
const EPISODE_PREFIX: &str = "Eps";

pub fn extract_seasons(document: &Html) -> Vec<Season> {
    document
        .select(&SEASON)
        .map(|el| {
            let name = text_of(el);
            Season {
                season_number: parse_season_number(&name),
                season_id: el.value().attr("data-id").unwrap_or_default().trim().to_string(),
                name,
            }
        })
        .collect()
}

/// `"Season 3"` → 3; anything else → 0.
pub fn parse_season_number(name: &str) -> u32 {
    let stripped = name.replacen(SEASON_PREFIX, "", 1);
    Field::parse_with(Some(stripped.as_str()), leading_number).or_default()
}

pub fn extract_episodes(document: &Html) -> Vec<Episode> {
    document
        .select(&EPISODE)
        .map(|el| {
            let (number, title) = parse_episode_title(el.value().attr("title").unwrap_or_default());
            Episode {
                id: el.value().attr("data-id").unwrap_or_default().trim().to_string(),
                number,
                title,
            }
        })
        .collect()
}

/// Split an `"Eps N: Title"` attribute.
///
/// Only the first colon separates number from title. Attributes without a
/// colon come back as `(0, raw)`.
pub fn parse_episode_title(raw: &str) -> (u32, String) {
    match raw.split_once(':') {
        Some((head, title)) => {
            let head = head.replacen(EPISODE_PREFIX, "", 1);
            let number = Field::parse_with(Some(head.as_str()), leading_number).or_default();
            (number, title.trim().to_string())
        }
        None => (0, raw.trim().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_numbers() {
        assert_eq!(parse_season_number("Season 3"), 3);
        assert_eq!(parse_season_number("Season 12"), 12);
        assert_eq!(parse_season_number("Specials"), 0);
        assert_eq!(parse_season_number(""), 0);
    }

    #[test]
    fn episode_titles_split_on_first_colon_only() {
        assert_eq!(parse_episode_title("Eps 4: The Turn"), (4, "The Turn".to_string()));
        assert_eq!(
            parse_episode_title("Eps 4: Part One: Revenge"),
            (4, "Part One: Revenge".to_string())
        );
        assert_eq!(parse_episode_title("Pilot"), (0, "Pilot".to_string()));
        assert_eq!(parse_episode_title("Eps ?: Unknown"), (0, "Unknown".to_string()));
    }

    #[test]
    fn seasons_from_dropdown() {
        let html = r#"
        <div class="dropdown-menu">
          <a data-id="1971" class="dropdown-item ss-item" href="javascript:;">Season 1</a>
          <a data-id="1972" class="dropdown-item ss-item" href="javascript:;">Season 2</a>
          <a data-id="2001" class="dropdown-item ss-item" href="javascript:;">Specials</a>
          <a data-id="9999" class="dropdown-item" href="javascript:;">Season 4</a>
        </div>"#;
        let seasons = extract_seasons(&Html::parse_fragment(html));
        assert_eq!(seasons.len(), 3);
        assert_eq!(
            seasons[1],
            Season {
                season_number: 2,
                season_id: "1972".into(),
                name: "Season 2".into()
            }
        );
        assert_eq!(seasons[2].season_number, 0);
    }

    #[test]
    fn episodes_from_nav_list() {
        let html = r#"
        <ul class="nav">
          <li class="nav-item"><a id="episode-101" data-id="101" class="nav-link eps-item" title="Eps 1: Pilot"><strong>Eps 1:</strong> Pilot</a></li>
          <li class="nav-item"><a data-id="102" class="nav-link eps-item" title="Eps 2: Part One: Revenge"></a></li>
          <li class="nav-item"><a data-id="103" class="nav-link eps-item"></a></li>
        </ul>"#;
        let episodes = extract_episodes(&Html::parse_fragment(html));
        assert_eq!(episodes.len(), 3);
        assert_eq!(episodes[0].number, 1);
        assert_eq!(episodes[0].title, "Pilot");
        assert_eq!(episodes[1].title, "Part One: Revenge");
        assert_eq!(episodes[2], Episode { id: "103".into(), number: 0, title: String::new() });
    }
}
