//! End-to-end behavior of the suggestion engine against an in-memory
//! engagement store.

use anyhow::Result;
use async_trait::async_trait;
use blog_service::models::UserSummary;
use blog_service::services::{EngagementReader, SuggestionEngine, SuggestionPolicy};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// In-memory stand-in for the Postgres reader. Likes and bookmarks are kept
/// oldest-first; reads return them newest-first like the SQL implementation.
#[derive(Default)]
struct StoreState {
    users: Vec<UserSummary>,
    post_tags: HashMap<Uuid, Vec<String>>,
    likes: Vec<(Uuid, Uuid)>,
    bookmarks: Vec<(Uuid, Uuid)>,
}

impl StoreState {
    fn engagement_tags(&self, pairs: &[(Uuid, Uuid)], user: Uuid, limit: i64) -> Vec<Vec<String>> {
        pairs
            .iter()
            .rev()
            .filter(|&&(u, _)| u == user)
            .take(limit as usize)
            .map(|&(_, p)| self.post_tags.get(&p).cloned().unwrap_or_default())
            .collect()
    }

    fn has_tagged_engagement(&self, pairs: &[(Uuid, Uuid)], user: Uuid, tags: &[String]) -> bool {
        pairs.iter().any(|&(u, p)| {
            u == user
                && self
                    .post_tags
                    .get(&p)
                    .map(|post_tags| post_tags.iter().any(|t| tags.contains(t)))
                    .unwrap_or(false)
        })
    }
}

/// Cloneable handle shared between the engine and the test body, so tests
/// can mutate engagement data between calls.
#[derive(Clone, Default)]
struct FakeStore(Arc<Mutex<StoreState>>);

impl FakeStore {
    fn add_user(&self, username: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.0.lock().unwrap().users.push(UserSummary {
            id,
            name: username.to_string(),
            username: username.to_string(),
            avatar_url: None,
        });
        id
    }

    fn add_post(&self, tags: &[&str]) -> Uuid {
        let id = Uuid::new_v4();
        self.0
            .lock()
            .unwrap()
            .post_tags
            .insert(id, tags.iter().map(|t| t.to_string()).collect());
        id
    }

    fn like(&self, user: Uuid, post: Uuid) {
        self.0.lock().unwrap().likes.push((user, post));
    }

    fn unlike(&self, user: Uuid, post: Uuid) {
        self.0
            .lock()
            .unwrap()
            .likes
            .retain(|&(u, p)| (u, p) != (user, post));
    }

    fn bookmark(&self, user: Uuid, post: Uuid) {
        self.0.lock().unwrap().bookmarks.push((user, post));
    }
}

#[async_trait]
impl EngagementReader for FakeStore {
    async fn liked_post_tags(&self, user_id: Uuid, limit: i64) -> Result<Vec<Vec<String>>> {
        let state = self.0.lock().unwrap();
        Ok(state.engagement_tags(&state.likes, user_id, limit))
    }

    async fn bookmarked_post_tags(&self, user_id: Uuid, limit: i64) -> Result<Vec<Vec<String>>> {
        let state = self.0.lock().unwrap();
        Ok(state.engagement_tags(&state.bookmarks, user_id, limit))
    }

    async fn users_engaged_with_tags(
        &self,
        tags: &[String],
        exclude_user: Uuid,
        limit: i64,
    ) -> Result<Vec<UserSummary>> {
        let state = self.0.lock().unwrap();
        Ok(state
            .users
            .iter()
            .filter(|u| u.id != exclude_user)
            .filter(|u| {
                state.has_tagged_engagement(&state.likes, u.id, tags)
                    || state.has_tagged_engagement(&state.bookmarks, u.id, tags)
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

fn engine_over(store: &FakeStore) -> SuggestionEngine<FakeStore> {
    SuggestionEngine::new(store.clone(), SuggestionPolicy::default())
}

fn ids(suggestions: &[UserSummary]) -> Vec<Uuid> {
    suggestions.iter().map(|u| u.id).collect()
}

#[tokio::test]
async fn shared_tag_via_bookmark_and_like_connects_users() {
    // U1 likes P1 (rust, web) and bookmarks P2 (go). U2 liked P3 (go).
    // U3 has no engagement at all.
    let store = FakeStore::default();
    let u1 = store.add_user("u1");
    let u2 = store.add_user("u2");
    let u3 = store.add_user("u3");

    let p1 = store.add_post(&["rust", "web"]);
    let p2 = store.add_post(&["go"]);
    let p3 = store.add_post(&["go"]);

    store.like(u1, p1);
    store.bookmark(u1, p2);
    store.like(u2, p3);

    let engine = engine_over(&store);

    let for_u1 = engine.suggest_for(u1).await.unwrap();
    assert!(ids(&for_u1).contains(&u2), "U2 shares 'go' with U1");
    assert!(!ids(&for_u1).contains(&u1), "never the requester");
    assert!(!ids(&for_u1).contains(&u3), "U3 has no engagement");

    // Symmetry: the overlap condition connects U2 back to U1.
    let for_u2 = engine.suggest_for(u2).await.unwrap();
    assert!(ids(&for_u2).contains(&u1));

    // A user with no history gets nothing.
    let for_u3 = engine.suggest_for(u3).await.unwrap();
    assert!(for_u3.is_empty());
}

#[tokio::test]
async fn disjoint_interests_never_connect() {
    let store = FakeStore::default();
    let u1 = store.add_user("u1");
    let u2 = store.add_user("u2");

    let p1 = store.add_post(&["rust"]);
    let p2 = store.add_post(&["cooking"]);

    store.like(u1, p1);
    store.like(u2, p2);

    let engine = engine_over(&store);
    assert!(engine.suggest_for(u1).await.unwrap().is_empty());
    assert!(engine.suggest_for(u2).await.unwrap().is_empty());
}

#[tokio::test]
async fn result_is_bounded_and_duplicate_free() {
    let store = FakeStore::default();
    let requester = store.add_user("requester");
    let shared = store.add_post(&["rust"]);
    store.like(requester, shared);

    // Six candidates, each engaged with "rust" through both relations.
    for i in 0..6 {
        let c = store.add_user(&format!("candidate{i}"));
        let p = store.add_post(&["rust"]);
        store.like(c, p);
        store.bookmark(c, p);
    }

    let engine = engine_over(&store);
    let result = engine.suggest_for(requester).await.unwrap();

    assert_eq!(result.len(), 4);
    let mut unique = ids(&result);
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 4, "no candidate appears twice");
}

#[tokio::test]
async fn deleting_the_only_like_empties_subsequent_results() {
    let store = FakeStore::default();
    let u1 = store.add_user("u1");
    let u2 = store.add_user("u2");

    let p1 = store.add_post(&["rust"]);
    let p2 = store.add_post(&["rust"]);

    store.like(u1, p1);
    store.like(u2, p2);

    let engine = engine_over(&store);
    assert_eq!(ids(&engine.suggest_for(u1).await.unwrap()), vec![u2]);

    // Nothing is cached across invocations: removing the only qualifying
    // like changes the next call's answer.
    store.unlike(u1, p1);
    assert!(engine.suggest_for(u1).await.unwrap().is_empty());
}

#[tokio::test]
async fn scan_limit_applies_per_relation() {
    let store = FakeStore::default();
    let u1 = store.add_user("u1");
    let u2 = store.add_user("u2");

    // Ten untagged likes fill the like window, but the bookmark window is
    // independent and still sees "rust".
    let tagged = store.add_post(&["rust"]);
    store.bookmark(u1, tagged);
    for _ in 0..10 {
        let p = store.add_post(&[]);
        store.like(u1, p);
    }

    let other = store.add_post(&["rust"]);
    store.like(u2, other);

    let engine = engine_over(&store);
    assert_eq!(ids(&engine.suggest_for(u1).await.unwrap()), vec![u2]);
}
