use crate::AssetId;

/// `pharma-asset-{slug}-{id}.{ext}` where the slug is the lower-cased name with
/// whitespace runs collapsed to `-` and path-hostile characters replaced by `_`.
pub fn asset_filename(name: &str, asset_id: AssetId, extension: &str) -> String {
    format!("pharma-asset-{}-{asset_id}.{extension}", slugify(name))
}

fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut prev_dash = false;
    for c in input.trim().chars() {
        if c.is_whitespace() {
            if !prev_dash {
                slug.push('-');
            }
            prev_dash = true;
            continue;
        }
        prev_dash = false;
        if is_forbidden(c) {
            slug.push('_');
        } else {
            slug.extend(c.to_lowercase());
        }
    }
    let slug = slug.trim_matches(&['-', '_', '.'][..]);
    if slug.is_empty() {
        return "untitled".to_string();
    }
    slug.chars().take(80).collect()
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}
