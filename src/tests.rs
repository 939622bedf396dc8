#[cfg(test)]
mod tests {

    mod slug_tests {
        use crate::services::slug::{generate_slug, validate_slug};

        #[test]
        fn test_generate_slug_basic() {
            assert_eq!(generate_slug("Hello World"), "hello-world");
        }

        #[test]
        fn test_generate_slug_special_characters() {
            assert_eq!(generate_slug("Hello, World!"), "hello-world");
        }

        #[test]
        fn test_validate_slug_valid() {
            assert!(validate_slug("hello-world"));
            assert!(validate_slug("post-2024"));
        }

        #[test]
        fn test_validate_slug_invalid() {
            assert!(!validate_slug(""));
            assert!(!validate_slug("Hello-World"));
            assert!(!validate_slug("hello world"));
        }
    }

    mod serialize_tests {
        use crate::models::{Post, PostDetail, Tag, TagWithCount, UserSummary};
        use crate::services::serialize::{serialize_post, serialize_post_detail};

        fn sample_detail(body: &str) -> PostDetail {
            PostDetail {
                post: Post {
                    id: 1,
                    title: "A post".to_string(),
                    body: body.to_string(),
                    slug: "a-post".to_string(),
                    image: None,
                    published_at: "2024-06-01T12:00:00Z".to_string(),
                    author_id: 7,
                },
                author: UserSummary {
                    id: 7,
                    username: "alice".to_string(),
                },
                likes_count: 3,
                tags: Vec::new(),
                comments: Vec::new(),
                comments_count: None,
            }
        }

        fn tag_with_count(id: i64, title: &str, posts_count: i64) -> TagWithCount {
            TagWithCount {
                tag: Tag {
                    id,
                    title: title.to_string(),
                    created_at: "2024-01-01 00:00:00".to_string(),
                },
                posts_count,
            }
        }

        #[test]
        fn test_teaser_is_exactly_200_chars() {
            let body: String = "x".repeat(500);
            let serialized = serialize_post(&sample_detail(&body), 200);
            assert_eq!(serialized.teaser_text.chars().count(), 200);
        }

        #[test]
        fn test_teaser_shorter_body_untouched() {
            let serialized = serialize_post(&sample_detail("short body"), 200);
            assert_eq!(serialized.teaser_text, "short body");
        }

        #[test]
        fn test_teaser_counts_characters_not_bytes() {
            let body: String = "ж".repeat(300);
            let serialized = serialize_post(&sample_detail(&body), 200);
            assert_eq!(serialized.teaser_text.chars().count(), 200);
        }

        #[test]
        fn test_first_tag_title_none_without_tags() {
            let serialized = serialize_post(&sample_detail("body"), 200);
            assert!(serialized.first_tag_title.is_none());
        }

        #[test]
        fn test_first_tag_title_present_with_tags() {
            let mut detail = sample_detail("body");
            detail.tags = vec![tag_with_count(1, "rust", 4), tag_with_count(2, "web", 2)];
            let serialized = serialize_post(&detail, 200);
            assert_eq!(serialized.first_tag_title.as_deref(), Some("rust"));
        }

        #[test]
        fn test_image_url_none_without_image() {
            let serialized = serialize_post(&sample_detail("body"), 200);
            assert!(serialized.image_url.is_none());
        }

        #[test]
        fn test_image_url_points_at_media_route() {
            let mut detail = sample_detail("body");
            detail.post.image = Some("cover.jpg".to_string());
            let serialized = serialize_post(&detail, 200);
            assert_eq!(serialized.image_url.as_deref(), Some("/media/cover.jpg"));
        }

        #[test]
        fn test_unannotated_comment_count_serializes_as_zero() {
            let serialized = serialize_post(&sample_detail("body"), 200);
            assert_eq!(serialized.comments_amount, 0);
        }

        #[test]
        fn test_annotated_comment_count_passes_through() {
            let mut detail = sample_detail("body");
            detail.comments_count = Some(12);
            let serialized = serialize_post(&detail, 200);
            assert_eq!(serialized.comments_amount, 12);
        }

        #[test]
        fn test_serialized_post_json_shape() {
            let serialized = serialize_post(&sample_detail("body"), 200);
            let value = serde_json::to_value(&serialized).unwrap();
            assert!(value["image_url"].is_null());
            assert!(value["first_tag_title"].is_null());
            assert_eq!(value["comments_amount"], 0);
        }

        #[test]
        fn test_detail_variant_keeps_full_text_and_likes() {
            let body: String = "y".repeat(500);
            let detail = sample_detail(&body);
            let serialized = serialize_post_detail(&detail);
            assert_eq!(serialized.text.len(), 500);
            assert_eq!(serialized.likes_amount, 3);
        }
    }

    mod config_tests {
        use crate::Config;
        use std::path::Path;

        #[test]
        fn test_config_load_missing_file() {
            let result = Config::load(Path::new("/nonexistent/path.toml"));
            assert!(result.is_err());
        }

        #[test]
        fn test_config_load_valid_toml() {
            use std::io::Write;
            let temp_dir = std::env::temp_dir();
            let config_path = temp_dir.join("test_bramble_config.toml");

            let config_content = r#"
[site]
title = "Test Blog"
url = "http://localhost:3000"

[database]
path = "data/bramble.db"
"#;

            let mut file = std::fs::File::create(&config_path).unwrap();
            file.write_all(config_content.as_bytes()).unwrap();

            let config = Config::load(&config_path).unwrap();
            assert_eq!(config.site.title, "Test Blog");
            assert_eq!(config.server.port, 3000);
            assert_eq!(config.content.front_page_limit, 5);
            assert_eq!(config.content.tag_page_limit, 20);
            assert_eq!(config.content.teaser_length, 200);

            std::fs::remove_file(&config_path).ok();
        }

        #[test]
        fn test_config_rejects_zero_teaser_length() {
            use std::io::Write;
            let temp_dir = std::env::temp_dir();
            let config_path = temp_dir.join("test_bramble_config_bad.toml");

            let config_content = r#"
[site]
title = "Test Blog"
url = "http://localhost:3000"

[database]
path = "data/bramble.db"

[content]
teaser_length = 0
"#;

            let mut file = std::fs::File::create(&config_path).unwrap();
            file.write_all(config_content.as_bytes()).unwrap();

            assert!(Config::load(&config_path).is_err());

            std::fs::remove_file(&config_path).ok();
        }
    }
}
