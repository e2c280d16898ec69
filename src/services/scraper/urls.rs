//! Candidate page URLs per page kind, canonical shape first.
//!
//! The site has moved its listing and detail pages between URL shapes; each
//! builder returns every shape in the order it should be tried.

use urlencoding::encode;

/// Player AJAX endpoint used to resolve `data-post`/`data-nume` options
pub fn player_ajax(base: &str) -> String {
    format!("{}/wp-admin/admin-ajax.php", base)
}

pub fn home(base: &str) -> Vec<String> {
    vec![format!("{}/", base)]
}

pub fn series_list(base: &str, page: u32) -> Vec<String> {
    if page <= 1 {
        vec![format!("{}/series-online/", base), format!("{}/series", base)]
    } else {
        vec![
            format!("{}/series-online/page/{}/", base, page),
            format!("{}/series/page/{}", base, page),
        ]
    }
}

pub fn series_detail(base: &str, id: &str) -> Vec<String> {
    vec![
        format!("{}/serie/{}/", base, id),
        format!("{}/serie/{}", base, id),
        format!("{}/series/{}", base, id),
        format!("{}/tv/{}", base, id),
    ]
}

pub fn movies_list(base: &str, page: u32) -> Vec<String> {
    if page <= 1 {
        vec![format!("{}/peliculas/", base), format!("{}/movies", base)]
    } else {
        vec![
            format!("{}/peliculas/page/{}/", base, page),
            format!("{}/movies/page/{}", base, page),
        ]
    }
}

pub fn movie_detail(base: &str, id: &str) -> Vec<String> {
    vec![
        format!("{}/pelicula/{}/", base, id),
        format!("{}/pelicula/{}", base, id),
        format!("{}/movies/{}", base, id),
        format!("{}/movie/{}", base, id),
    ]
}

pub fn search(base: &str, query: &str) -> Vec<String> {
    let q = encode(query);
    vec![
        format!("{}/?s={}", base, q),
        format!("{}/buscar?s={}", base, q),
        format!("{}/search?q={}", base, q),
        format!("{}/search/{}", base, q),
    ]
}
