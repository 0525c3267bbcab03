//! Aggregate statistics over a list of blogs.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::Blog;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FavoriteBlog {
    pub title: String,
    pub author: Option<String>,
    pub likes: u64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AuthorBlogs {
    pub author: String,
    pub blogs: usize,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AuthorLikes {
    pub author: String,
    pub likes: u64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BlogStats {
    pub blogs: usize,
    pub total_likes: u64,
    pub favorite_blog: Option<FavoriteBlog>,
    pub most_blogs: Option<AuthorBlogs>,
    pub most_likes: Option<AuthorLikes>,
}

pub fn total_likes(blogs: &[Blog]) -> u64 {
    blogs.iter().map(|b| b.likes).sum()
}

/// The most liked blog. The earliest one wins a tie.
pub fn favorite_blog(blogs: &[Blog]) -> Option<FavoriteBlog> {
    let mut best: Option<&Blog> = None;
    for blog in blogs {
        if best.map_or(true, |b| blog.likes > b.likes) {
            best = Some(blog);
        }
    }
    best.map(|b| FavoriteBlog {
        title: b.title.clone(),
        author: b.author.clone(),
        likes: b.likes,
    })
}

/// Tallies `value` per author, keeping first-seen order so ties resolve to
/// the author who appears first.
fn per_author(blogs: &[Blog], value: impl Fn(&Blog) -> u64) -> Option<(String, u64)> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for blog in blogs {
        let Some(author) = blog.author.as_deref() else {
            continue;
        };
        if !totals.contains_key(author) {
            order.push(author);
        }
        *totals.entry(author).or_insert(0) += value(blog);
    }

    let mut best: Option<(&str, u64)> = None;
    for author in order {
        let total = totals[author];
        if best.map_or(true, |(_, t)| total > t) {
            best = Some((author, total));
        }
    }
    best.map(|(author, total)| (author.to_string(), total))
}

pub fn most_blogs(blogs: &[Blog]) -> Option<AuthorBlogs> {
    per_author(blogs, |_| 1).map(|(author, count)| AuthorBlogs {
        author,
        blogs: count as usize,
    })
}

pub fn most_likes(blogs: &[Blog]) -> Option<AuthorLikes> {
    per_author(blogs, |b| b.likes).map(|(author, likes)| AuthorLikes { author, likes })
}

pub fn stats(blogs: &[Blog]) -> BlogStats {
    BlogStats {
        blogs: blogs.len(),
        total_likes: total_likes(blogs),
        favorite_blog: favorite_blog(blogs),
        most_blogs: most_blogs(blogs),
        most_likes: most_likes(blogs),
    }
}
