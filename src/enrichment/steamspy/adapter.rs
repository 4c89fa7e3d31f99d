//! Adapter layer: SteamSpy tag votes to a ranked tag list

use super::dto;

/// Most tags kept per title
pub const MAX_TAGS: usize = 10;

/// Rank tags by vote count, highest first, ties alphabetical.
pub fn to_ranked_tags(details: dto::AppDetails) -> Vec<String> {
    let dto::Tags::Votes(votes) = details.tags else {
        return Vec::new();
    };

    let mut ranked: Vec<(String, u64)> = votes
        .into_iter()
        .filter(|(tag, _)| !tag.trim().is_empty())
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(MAX_TAGS);
    ranked.into_iter().map(|(tag, _)| tag).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn details(votes: &[(&str, u64)]) -> dto::AppDetails {
        dto::AppDetails {
            appid: Some(1),
            name: None,
            tags: dto::Tags::Votes(
                votes
                    .iter()
                    .map(|(t, v)| (t.to_string(), *v))
                    .collect::<HashMap<_, _>>(),
            ),
        }
    }

    #[test]
    fn test_ranked_by_votes() {
        let tags = to_ranked_tags(details(&[("Co-op", 30), ("Puzzle", 90), ("Funny", 30)]));
        assert_eq!(tags, vec!["Puzzle", "Co-op", "Funny"]);
    }

    #[test]
    fn test_truncated_to_ten() {
        let votes: Vec<(String, u64)> = (0..15).map(|i| (format!("tag{i:02}"), i)).collect();
        let refs: Vec<(&str, u64)> = votes.iter().map(|(t, v)| (t.as_str(), *v)).collect();
        let tags = to_ranked_tags(details(&refs));
        assert_eq!(tags.len(), MAX_TAGS);
        assert_eq!(tags[0], "tag14");
        assert_eq!(tags[9], "tag05");
    }

    #[test]
    fn test_empty_tags() {
        let empty = dto::AppDetails {
            appid: Some(1),
            name: None,
            tags: dto::Tags::default(),
        };
        assert!(to_ranked_tags(empty).is_empty());
    }
}
