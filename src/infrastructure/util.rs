// src/infrastructure/util.rs
use crate::application::ports::util::SlugGenerator;
use slug::slugify;

const MAX_SLUG_LEN: usize = 64;

/// ASCII, lowercase, dash separated slugs capped at 64 characters.
#[derive(Default, Clone)]
pub struct DefaultSlugGenerator;

impl SlugGenerator for DefaultSlugGenerator {
    fn slugify(&self, input: &str) -> String {
        let slug = slugify(input);
        if slug.len() <= MAX_SLUG_LEN {
            return slug;
        }
        slug[..MAX_SLUG_LEN].trim_end_matches('-').to_string()
    }
}
