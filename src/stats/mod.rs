//! Aggregate views over the family library.
//!
//! Everything here is read-only and computed on demand from the stored
//! ownership, playtime, entry, and title rows.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use sqlx::SqliteConnection;

use crate::model::{Account, AppId, SortOrder, SteamId};

/// Tags so common they say nothing about a title.
pub const EXCLUDED_TAGS: &[&str] = &["Singleplayer", "Multiplayer", "Free to Play"];

/// Default length of tag leaderboards.
pub const TOP_TAG_LIMIT: usize = 10;

/// Totals for one member.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSummary {
    pub titles_owned: usize,
    /// Owned titles with any recorded playtime
    pub titles_played: usize,
    pub total_hours: f64,
    pub titles_rated: usize,
    pub average_rating: Option<f64>,
    /// Owned title with the most hours, if any has been played
    pub most_played: Option<MostPlayed>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MostPlayed {
    pub appid: AppId,
    pub title: String,
    pub hours: f64,
}

pub async fn account_summary(
    conn: &mut SqliteConnection,
    account: &Account,
) -> sqlx::Result<AccountSummary> {
    let (titles_owned,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM owned_titles WHERE steamid = ?")
            .bind(&account.steamid)
            .fetch_one(&mut *conn)
            .await?;

    let (titles_played, total_hours): (i64, f64) = sqlx::query_as(
        r#"
        SELECT COUNT(CASE WHEN hours > 0 THEN 1 END), COALESCE(SUM(hours), 0.0)
        FROM playtime
        WHERE steamid = ?
        "#,
    )
    .bind(&account.steamid)
    .fetch_one(&mut *conn)
    .await?;

    let ratings: Vec<(i64,)> = sqlx::query_as(
        "SELECT rating FROM user_game_entries WHERE account_id = ? AND rating IS NOT NULL",
    )
    .bind(account.id)
    .fetch_all(&mut *conn)
    .await?;
    let ratings: Vec<i64> = ratings.into_iter().map(|(r,)| r).collect();

    let most_played = sqlx::query_as::<_, (AppId, String, f64)>(
        r#"
        SELECT p.appid, COALESCE(t.title, 'Unknown title'), p.hours
        FROM playtime p
        LEFT JOIN titles t ON t.appid = p.appid
        WHERE p.steamid = ? AND p.hours > 0
        ORDER BY p.hours DESC, t.title COLLATE NOCASE
        LIMIT 1
        "#,
    )
    .bind(&account.steamid)
    .fetch_optional(&mut *conn)
    .await?
    .map(|(appid, title, hours)| MostPlayed { appid, title, hours });

    Ok(AccountSummary {
        titles_owned: titles_owned as usize,
        titles_played: titles_played as usize,
        total_hours,
        titles_rated: ratings.len(),
        average_rating: mean(&ratings),
        most_played,
    })
}

/// One title as seen by the whole family.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyRanking {
    pub appid: AppId,
    pub title: String,
    pub cover_url: Option<String>,
    pub average_rating: Option<f64>,
    /// Population standard deviation of the ratings; `None` with fewer
    /// than two ratings
    pub rating_spread: Option<f64>,
    pub ratings: usize,
    /// Hours summed over every registered member
    pub total_hours: f64,
}

/// Every title owned by at least one member, ranked.
///
/// By rating: highest average first, then the most agreed-upon (lowest
/// spread). Unrated titles go last.
pub async fn family_rankings(
    conn: &mut SqliteConnection,
    sort: SortOrder,
) -> sqlx::Result<Vec<FamilyRanking>> {
    let titles: Vec<(AppId, String, Option<String>)> = sqlx::query_as(
        r#"
        SELECT DISTINCT
            o.appid,
            COALESCE(t.title, 'Unknown title'),
            COALESCE(t.custom_cover_url, t.cover_url)
        FROM owned_titles o
        LEFT JOIN titles t ON t.appid = o.appid
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    let hours: HashMap<AppId, f64> = sqlx::query_as::<_, (AppId, f64)>(
        r#"
        SELECT p.appid, SUM(p.hours)
        FROM playtime p
        JOIN accounts a ON a.steamid = p.steamid
        GROUP BY p.appid
        "#,
    )
    .fetch_all(&mut *conn)
    .await?
    .into_iter()
    .collect();

    let mut ratings: HashMap<AppId, Vec<i64>> = HashMap::new();
    let rows: Vec<(AppId, i64)> =
        sqlx::query_as("SELECT appid, rating FROM user_game_entries WHERE rating IS NOT NULL")
            .fetch_all(&mut *conn)
            .await?;
    for (appid, rating) in rows {
        ratings.entry(appid).or_default().push(rating);
    }

    let mut rankings: Vec<FamilyRanking> = titles
        .into_iter()
        .map(|(appid, title, cover_url)| {
            let scores = ratings.get(&appid).map(Vec::as_slice).unwrap_or(&[]);
            FamilyRanking {
                appid,
                title,
                cover_url,
                average_rating: mean(scores),
                rating_spread: population_std_dev(scores),
                ratings: scores.len(),
                total_hours: hours.get(&appid).copied().unwrap_or(0.0),
            }
        })
        .collect();

    sort_rankings(&mut rankings, sort);
    Ok(rankings)
}

fn sort_rankings(rankings: &mut [FamilyRanking], sort: SortOrder) {
    let by_name = |a: &FamilyRanking, b: &FamilyRanking| {
        a.title.to_lowercase().cmp(&b.title.to_lowercase())
    };
    match sort {
        SortOrder::Name => rankings.sort_by(by_name),
        SortOrder::Hours => rankings.sort_by(|a, b| {
            b.total_hours
                .partial_cmp(&a.total_hours)
                .unwrap_or(Ordering::Equal)
                .then_with(|| by_name(a, b))
        }),
        SortOrder::Rating => rankings.sort_by(|a, b| {
            let avg = |r: &FamilyRanking| r.average_rating.unwrap_or(-1.0);
            let spread = |r: &FamilyRanking| r.rating_spread.unwrap_or(f64::INFINITY);
            avg(b)
                .partial_cmp(&avg(a))
                .unwrap_or(Ordering::Equal)
                .then_with(|| spread(a).partial_cmp(&spread(b)).unwrap_or(Ordering::Equal))
                .then_with(|| by_name(a, b))
        }),
    }
}

/// How often a tag appears and how much it is played.
#[derive(Debug, Clone, PartialEq)]
pub struct TagCount {
    pub tag: String,
    /// Distinct owned titles carrying the tag
    pub titles: usize,
    pub hours: f64,
}

/// The most common tags, either for one member or the whole family.
pub async fn top_tags(
    conn: &mut SqliteConnection,
    steam_id: Option<&SteamId>,
    limit: usize,
) -> sqlx::Result<Vec<TagCount>> {
    let rows: Vec<(AppId, Option<String>, f64)> = match steam_id {
        Some(steam_id) => {
            sqlx::query_as(
                r#"
                SELECT o.appid, t.tags, COALESCE(p.hours, 0.0)
                FROM owned_titles o
                JOIN titles t ON t.appid = o.appid
                LEFT JOIN playtime p ON p.appid = o.appid AND p.steamid = o.steamid
                WHERE o.steamid = ?
                "#,
            )
            .bind(steam_id.as_str())
            .fetch_all(&mut *conn)
            .await?
        }
        None => {
            sqlx::query_as(
                r#"
                SELECT t.appid, t.tags,
                    COALESCE((SELECT SUM(p.hours) FROM playtime p WHERE p.appid = t.appid), 0.0)
                FROM titles t
                WHERE t.appid IN (SELECT appid FROM owned_titles)
                "#,
            )
            .fetch_all(&mut *conn)
            .await?
        }
    };

    Ok(rank_tags(rows, limit))
}

fn rank_tags(rows: Vec<(AppId, Option<String>, f64)>, limit: usize) -> Vec<TagCount> {
    // BTreeMap keeps ties in alphabetical order after the stable sort
    let mut counts: BTreeMap<String, (usize, f64)> = BTreeMap::new();
    for (_, tags, hours) in rows {
        let Some(tags) = tags else { continue };
        for tag in tags.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if is_excluded_tag(tag) {
                continue;
            }
            let entry = counts.entry(tag.to_string()).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += hours;
        }
    }

    let mut ranked: Vec<TagCount> = counts
        .into_iter()
        .map(|(tag, (titles, hours))| TagCount { tag, titles, hours })
        .collect();
    ranked.sort_by(|a, b| b.titles.cmp(&a.titles));
    ranked.truncate(limit);
    ranked
}

/// How closely two members rate the titles they have both rated.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberSimilarity {
    pub first: i64,
    pub second: i64,
    /// `1 - mean(|difference|) / 10`, clamped to 0..=1; `None` without
    /// shared ratings
    pub similarity: Option<f64>,
    pub shared_ratings: usize,
}

/// Rating agreement for every pair of members, each pair once.
pub async fn member_similarity(conn: &mut SqliteConnection) -> sqlx::Result<Vec<MemberSimilarity>> {
    let members: Vec<(i64,)> = sqlx::query_as("SELECT id FROM accounts ORDER BY id")
        .fetch_all(&mut *conn)
        .await?;

    let rows: Vec<(i64, AppId, i64)> = sqlx::query_as(
        "SELECT account_id, appid, rating FROM user_game_entries WHERE rating IS NOT NULL",
    )
    .fetch_all(&mut *conn)
    .await?;
    let mut ratings: HashMap<i64, HashMap<AppId, i64>> = HashMap::new();
    for (account_id, appid, rating) in rows {
        ratings.entry(account_id).or_default().insert(appid, rating);
    }

    let empty = HashMap::new();
    let mut pairs = Vec::new();
    for (i, &(first,)) in members.iter().enumerate() {
        for &(second,) in &members[i + 1..] {
            let (similarity, shared_ratings) = rating_agreement(
                ratings.get(&first).unwrap_or(&empty),
                ratings.get(&second).unwrap_or(&empty),
            );
            pairs.push(MemberSimilarity {
                first,
                second,
                similarity,
                shared_ratings,
            });
        }
    }
    Ok(pairs)
}

fn rating_agreement(a: &HashMap<AppId, i64>, b: &HashMap<AppId, i64>) -> (Option<f64>, usize) {
    let diffs: Vec<i64> = a
        .iter()
        .filter_map(|(appid, ra)| b.get(appid).map(|rb| (ra - rb).abs()))
        .collect();
    let similarity = mean(&diffs).map(|d| (1.0 - d / 10.0).clamp(0.0, 1.0));
    (similarity, diffs.len())
}

/// A member's average rating across titles carrying one tag.
#[derive(Debug, Clone, PartialEq)]
pub struct TagAffinity {
    pub tag: String,
    pub average_rating: f64,
    pub ratings: usize,
}

/// Which tags a member rates highest, best first.
///
/// Generic tags are skipped.
pub async fn tag_affinity(
    conn: &mut SqliteConnection,
    account: &Account,
) -> sqlx::Result<Vec<TagAffinity>> {
    let rows: Vec<(i64, Option<String>)> = sqlx::query_as(
        r#"
        SELECT e.rating, t.tags
        FROM user_game_entries e
        JOIN titles t ON t.appid = e.appid
        WHERE e.account_id = ? AND e.rating IS NOT NULL
        "#,
    )
    .bind(account.id)
    .fetch_all(&mut *conn)
    .await?;

    let mut by_tag: BTreeMap<String, Vec<i64>> = BTreeMap::new();
    for (rating, tags) in rows {
        let Some(tags) = tags else { continue };
        for tag in tags.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if !is_excluded_tag(tag) {
                by_tag.entry(tag.to_string()).or_default().push(rating);
            }
        }
    }

    let mut affinity: Vec<TagAffinity> = by_tag
        .into_iter()
        .filter_map(|(tag, ratings)| {
            Some(TagAffinity {
                average_rating: mean(&ratings)?,
                ratings: ratings.len(),
                tag,
            })
        })
        .collect();
    affinity.sort_by(|a, b| {
        b.average_rating
            .partial_cmp(&a.average_rating)
            .unwrap_or(Ordering::Equal)
    });
    Ok(affinity)
}

pub fn is_excluded_tag(tag: &str) -> bool {
    EXCLUDED_TAGS.iter().any(|t| t.eq_ignore_ascii_case(tag))
}

fn mean(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<i64>() as f64 / values.len() as f64)
}

/// Population standard deviation; needs at least two samples.
pub fn population_std_dev(values: &[i64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance = values
        .iter()
        .map(|&v| (v as f64 - mean).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    Some(variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{accounts, entries, library, titles};
    use crate::test_utils::{insert_account, steam_id, temp_db};

    #[test]
    fn test_population_std_dev() {
        assert_eq!(population_std_dev(&[]), None);
        assert_eq!(population_std_dev(&[7]), None);
        assert_eq!(population_std_dev(&[5, 5]), Some(0.0));
        assert_eq!(population_std_dev(&[2, 4, 4, 4, 5, 5, 7, 9]), Some(2.0));
    }

    #[test]
    fn test_excluded_tags() {
        assert!(is_excluded_tag("Singleplayer"));
        assert!(is_excluded_tag("free to play"));
        assert!(!is_excluded_tag("Puzzle"));
    }

    #[test]
    fn test_rank_tags_counts_and_ties() {
        let rows = vec![
            (1, Some("Puzzle,Co-op,Singleplayer".to_string()), 2.0),
            (2, Some("Puzzle, Action".to_string()), 3.0),
            (3, None, 10.0),
            (4, Some("Co-op".to_string()), 1.0),
        ];
        let ranked = rank_tags(rows, 10);
        let names: Vec<_> = ranked.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(names, vec!["Co-op", "Puzzle", "Action"]);
        assert_eq!(ranked[1].titles, 2);
        assert_eq!(ranked[1].hours, 5.0);
    }

    async fn seed_family(conn: &mut SqliteConnection) -> (Account, Account) {
        let (a, b) = (steam_id(1), steam_id(2));
        let alice = insert_account(conn, "alice", &a).await;
        let bob = insert_account(conn, "bob", &b).await;

        for (appid, name) in [(1, "Agreed"), (2, "Divisive"), (3, "Unrated")] {
            titles::ensure_title_stub(conn, appid, Some(name)).await.unwrap();
        }
        for (sid, appid, hours) in [(&a, 1, 5.0), (&a, 2, 1.0), (&b, 2, 2.0), (&b, 3, 50.0)] {
            library::ensure_ownership(conn, sid, appid).await.unwrap();
            library::upsert_playtime(conn, sid, appid, hours, "t").await.unwrap();
        }
        // Same 8.0 average; title 1 has the tighter spread
        entries::rate_title(conn, alice, 1, 8).await.unwrap();
        entries::rate_title(conn, bob, 1, 8).await.unwrap();
        entries::rate_title(conn, alice, 2, 10).await.unwrap();
        entries::rate_title(conn, bob, 2, 6).await.unwrap();

        (
            accounts::get_by_id(conn, alice).await.unwrap().unwrap(),
            accounts::get_by_id(conn, bob).await.unwrap().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_family_rankings_sorting() {
        let (pool, _dir) = temp_db().await;
        let mut conn = pool.acquire().await.unwrap();
        seed_family(&mut conn).await;

        let by_rating = family_rankings(&mut conn, SortOrder::Rating).await.unwrap();
        let order: Vec<_> = by_rating.iter().map(|r| r.appid).collect();
        assert_eq!(order, vec![1, 2, 3]);
        assert_eq!(by_rating[1].average_rating, Some(8.0));
        assert_eq!(by_rating[1].rating_spread, Some(2.0));
        assert_eq!(by_rating[2].average_rating, None);

        let by_hours = family_rankings(&mut conn, SortOrder::Hours).await.unwrap();
        assert_eq!(by_hours[0].appid, 3);
        assert_eq!(by_hours[1].total_hours, 5.0);

        let by_name = family_rankings(&mut conn, SortOrder::Name).await.unwrap();
        let names: Vec<_> = by_name.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(names, vec!["Agreed", "Divisive", "Unrated"]);
    }

    #[tokio::test]
    async fn test_account_summary() {
        let (pool, _dir) = temp_db().await;
        let mut conn = pool.acquire().await.unwrap();
        let (alice, _) = seed_family(&mut conn).await;

        let summary = account_summary(&mut conn, &alice).await.unwrap();
        assert_eq!(summary.titles_owned, 2);
        assert_eq!(summary.titles_played, 2);
        assert_eq!(summary.total_hours, 6.0);
        assert_eq!(summary.titles_rated, 2);
        assert_eq!(summary.average_rating, Some(9.0));
        let top = summary.most_played.unwrap();
        assert_eq!((top.appid, top.title.as_str(), top.hours), (1, "Agreed", 5.0));
    }

    #[tokio::test]
    async fn test_unplayed_member_has_no_most_played() {
        let (pool, _dir) = temp_db().await;
        let mut conn = pool.acquire().await.unwrap();
        let sid = steam_id(9);
        let id = insert_account(&mut conn, "newcomer", &sid).await;
        library::ensure_ownership(&mut conn, &sid, 1).await.unwrap();
        library::upsert_playtime(&mut conn, &sid, 1, 0.0, "t").await.unwrap();

        let account = accounts::get_by_id(&mut conn, id).await.unwrap().unwrap();
        let summary = account_summary(&mut conn, &account).await.unwrap();
        assert_eq!(summary.most_played, None);
    }

    #[test]
    fn test_rating_agreement() {
        let a: HashMap<AppId, i64> = [(1, 8), (2, 10), (3, 4)].into_iter().collect();
        let b: HashMap<AppId, i64> = [(1, 8), (2, 6), (9, 1)].into_iter().collect();
        // Shared: 1 (diff 0) and 2 (diff 4) -> mean 2 -> 0.8
        let (similarity, shared) = rating_agreement(&a, &b);
        assert_eq!(shared, 2);
        assert!((similarity.unwrap() - 0.8).abs() < 1e-9);

        let none: HashMap<AppId, i64> = HashMap::new();
        assert_eq!(rating_agreement(&a, &none), (None, 0));
    }

    #[tokio::test]
    async fn test_member_similarity_pairs() {
        let (pool, _dir) = temp_db().await;
        let mut conn = pool.acquire().await.unwrap();
        let (alice, bob) = seed_family(&mut conn).await;
        let carol = insert_account(&mut conn, "carol", &steam_id(3)).await;

        let pairs = member_similarity(&mut conn).await.unwrap();
        assert_eq!(pairs.len(), 3);

        let alice_bob = pairs
            .iter()
            .find(|p| p.first == alice.id && p.second == bob.id)
            .unwrap();
        assert_eq!(alice_bob.shared_ratings, 2);
        assert!((alice_bob.similarity.unwrap() - 0.8).abs() < 1e-9);

        assert!(pairs
            .iter()
            .filter(|p| p.second == carol)
            .all(|p| p.similarity.is_none() && p.shared_ratings == 0));
    }

    #[tokio::test]
    async fn test_tag_affinity() {
        let (pool, _dir) = temp_db().await;
        let mut conn = pool.acquire().await.unwrap();
        let (alice, _) = seed_family(&mut conn).await;
        sqlx::query("UPDATE titles SET tags = 'Puzzle,Singleplayer' WHERE appid = 1")
            .execute(&mut *conn)
            .await
            .unwrap();
        sqlx::query("UPDATE titles SET tags = 'Puzzle,Action' WHERE appid = 2")
            .execute(&mut *conn)
            .await
            .unwrap();

        // Alice: title 1 = 8, title 2 = 10
        let affinity = tag_affinity(&mut conn, &alice).await.unwrap();
        let view: Vec<_> = affinity
            .iter()
            .map(|a| (a.tag.as_str(), a.average_rating, a.ratings))
            .collect();
        assert_eq!(view, vec![("Action", 10.0, 1), ("Puzzle", 9.0, 2)]);
    }

    #[tokio::test]
    async fn test_top_tags_scopes() {
        let (pool, _dir) = temp_db().await;
        let mut conn = pool.acquire().await.unwrap();
        seed_family(&mut conn).await;
        sqlx::query("UPDATE titles SET tags = 'Puzzle,Singleplayer' WHERE appid IN (1, 2)")
            .execute(&mut *conn)
            .await
            .unwrap();
        sqlx::query("UPDATE titles SET tags = 'Survival' WHERE appid = 3")
            .execute(&mut *conn)
            .await
            .unwrap();

        let family = top_tags(&mut conn, None, TOP_TAG_LIMIT).await.unwrap();
        assert_eq!(family[0].tag, "Puzzle");
        assert_eq!(family[0].titles, 2);
        assert!(family.iter().all(|t| t.tag != "Singleplayer"));

        let bob = steam_id(2);
        let mine = top_tags(&mut conn, Some(&bob), TOP_TAG_LIMIT).await.unwrap();
        let names: Vec<_> = mine.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(names, vec!["Puzzle", "Survival"]);
        assert_eq!(mine[0].hours, 2.0);
        assert_eq!(mine[1].hours, 50.0);

        let capped = top_tags(&mut conn, Some(&bob), 1).await.unwrap();
        assert_eq!(capped.len(), 1);
    }
}
