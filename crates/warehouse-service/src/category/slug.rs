//! URL slugs for category names, transliterating Cyrillic.

use std::collections::HashSet;

fn transliterate(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' | 'ё' | 'э' => "e",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' | 'ы' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}

/// Lowercase ASCII slug: Cyrillic transliterated, runs of anything else
/// collapsed to a single `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if let Some(latin) = transliterate(c) {
            slug.push_str(latin);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

/// Hands out unique slugs, suffixing `-1`, `-2`, … on collisions.
#[derive(Debug, Default)]
pub struct SlugAllocator {
    used: HashSet<String>,
}

impl SlugAllocator {
    /// Allocator that treats `used` as already taken.
    pub fn with_used(used: impl IntoIterator<Item = String>) -> Self {
        Self {
            used: used.into_iter().collect(),
        }
    }

    /// Unique slug for `name`.
    pub fn allocate(&mut self, name: &str) -> String {
        let base = match slugify(name) {
            s if s.is_empty() => "category".to_string(),
            s => s,
        };
        let mut slug = base.clone();
        let mut counter = 1;
        while self.used.contains(&slug) {
            slug = format!("{base}-{counter}");
            counter += 1;
        }
        self.used.insert(slug.clone());
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_cyrillic() {
        assert_eq!(slugify("Футболка"), "futbolka");
        assert_eq!(slugify("Зип-худи"), "zip-hudi");
        assert_eq!(slugify("  Без категории "), "bez-kategorii");
        assert_eq!(slugify("Щётка & Co."), "schetka-co");
    }

    #[test]
    fn test_allocator_suffixes_duplicates() {
        let mut slugs = SlugAllocator::default();
        assert_eq!(slugs.allocate("Худи"), "hudi");
        assert_eq!(slugs.allocate("худи"), "hudi-1");
        assert_eq!(slugs.allocate("Худи!"), "hudi-2");
        assert_eq!(slugs.allocate("***"), "category");

        let mut taken = SlugAllocator::with_used(["kepka".to_string()]);
        assert_eq!(taken.allocate("Кепка"), "kepka-1");
    }
}
