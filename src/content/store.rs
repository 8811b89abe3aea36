use std::collections::HashMap;

use super::model::Post;

#[derive(Clone, Debug, Default)]
pub struct PostStore {
    posts: Vec<Post>,
    index_by_id: HashMap<String, usize>,
}

impl PostStore {
    pub fn new(posts: Vec<Post>) -> Self {
        let mut index_by_id = HashMap::with_capacity(posts.len());
        for (index, post) in posts.iter().enumerate() {
            index_by_id.entry(post.id.clone()).or_insert(index);
        }

        Self { posts, index_by_id }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn find(&self, id: &str) -> Option<&Post> {
        self.index_by_id.get(id).map(|&index| &self.posts[index])
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::DifficultyLevel;

    fn post(id: &str) -> Post {
        Post {
            id: id.to_string(),
            title: id.to_uppercase(),
            description: String::new(),
            difficulty_level: DifficultyLevel::Beginner,
            category: String::new(),
            prerequisites: Vec::new(),
            related_topics: Vec::new(),
            follow_ups: Vec::new(),
            author: None,
            tags: Vec::new(),
            estimated_read_time: None,
        }
    }

    #[test]
    fn find_resolves_by_id() {
        let store = PostStore::new(vec![post("a"), post("b")]);
        assert_eq!(store.find("b").map(|p| p.title.as_str()), Some("B"));
        assert!(store.find("missing").is_none());
        assert_eq!(store.len(), 2);
    }
}
