//! HTML fixtures and a scripted fetcher for scraper tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::services::fetcher::{FetchError, PageFetcher};

pub const BASE: &str = "https://site.test";

pub const SERIES_LIST: &str = r#"
<html><body><ul class="MovieList">
  <li><article class="TPost B">
    <a href="/serie/the-wire/">
      <div class="Image"><figure><img src="/img/wire.jpg" alt=""></figure></div>
      <h2 class="Title">The Wire</h2>
    </a>
    <span class="Qlty">2002</span>
  </article></li>
  <li><article class="TPost B">
    <a href="https://site.test/serie/dark/" title="Dark">
      <div class="Image"><figure><img src="data:image/gif;base64,R0lGOD" data-src="//cdn.test/dark.jpg"></figure></div>
    </a>
    <div class="Info"><span>Serie</span> • 2017</div>
  </article></li>
  <li><article class="TPost B"><h2 class="Title">Sin enlace</h2></article></li>
</ul></body></html>
"#;

pub const HOME: &str = r#"
<html><body>
<div class="slider">
  <article class="TPost A"><a href="/serie/the-wire/"><h2 class="Title">The Wire</h2><img src="/img/wire-wide.jpg"></a><span class="Qlty">2002</span></article>
  <article class="TPost A"><a href="/serie/dark/"><h2 class="Title">Dark</h2></a></article>
</div>
<section class="trending">
  <article class="TPost B"><a href="/serie/fargo/"><h2 class="Title">Fargo</h2></a></article>
  <article class="TPost C"><a href="/serie/fargo/"><h2 class="Title">Fargo</h2></a></article>
  <article class="TPost B"><a href="/serie/lost/"><h2 class="Title">Lost</h2></a></article>
</section>
<section class="movies-list">
  <div class="item"><a href="/pelicula/heat/"><h3>Heat</h3></a><span class="year">1995</span></div>
</section>
<section class="latest-episodes"><ul>
  <li><a href="/episodio/the-wire-1x03/"><img src="/img/e103.jpg"><span class="Title">The Wire 1x03</span></a></li>
  <li><a href="/episodio/the-wire-1x03/">dup</a></li>
  <li><a href="/episodio/dark-especial/"><span class="Title">Dark: especial</span></a></li>
</ul></section>
</body></html>
"#;

/// One explicit season container, episodes numbered 1, 3, 2 in document order
pub const SERIES_DETAIL_CONTAINERS: &str = r#"
<html><body>
<article class="TPost">
  <header>
    <h1 class="Title">The Wire</h1>
    <div class="Image"><figure><img src="/img/wire-poster.jpg"></figure></div>
    <p class="Info"><span class="Qlty">2002</span> <span class="Time">58 min</span></p>
  </header>
  <div class="Description">Baltimore,  seen through its
     drug scene.</div>
  <p class="genres">
    <a href="/genero/drama/">Drama</a> <a href="/genero/crimen/">Crimen</a> <a href="/genero/drama/">Drama</a>
  </p>
  <ul class="cast">
    <li><a href="/actor/dominic-west/">Dominic West</a></li>
    <li><a href="/actor/idris-elba/">Idris Elba</a></li>
  </ul>
</article>
<section id="seasons">
  <div class="season">
    <div class="se-t">1</div>
    <ul>
      <li class="episode"><span class="numerando">1 - 1</span><div class="episodiotitle"><a href="/episodio/the-wire-1x01/">The Target</a></div></li>
      <li class="episode"><span class="numerando">1 - 3</span><div class="episodiotitle"><a href="/episodio/the-wire-1x03/">The Buys</a></div></li>
      <li class="episode"><span class="numerando">1 - 2</span><div class="episodiotitle"><a href="/episodio/the-wire-1x02/">The Detail</a></div></li>
    </ul>
  </div>
</section>
</body></html>
"#;

/// Two containers claim season 9
pub const SERIES_DETAIL_DUPLICATE_SEASON: &str = r#"
<html><body>
<h1>Twin</h1>
<div id="seasons">
  <div class="se-c">
    <div class="se-q"><span class="se-t">Temporada 9</span></div>
    <div class="se-a"><ul class="episodios">
      <li><div class="episodiotitle"><a href="/episodio/twin-9x01/">First nine</a></div></li>
    </ul></div>
  </div>
  <div class="se-c">
    <div class="se-q"><span class="se-t">Temporada 2</span></div>
    <div class="se-a"><ul class="episodios">
      <li><div class="episodiotitle"><a href="/episodio/twin-2x01/">Two</a></div></li>
    </ul></div>
  </div>
  <div class="se-c">
    <div class="se-q"><span class="se-t">Temporada 9</span></div>
    <div class="se-a"><ul class="episodios">
      <li><div class="episodiotitle"><a href="/episodio/twin-9x01b/">Second nine</a></div></li>
      <li><div class="episodiotitle"><a href="/episodio/twin-9x02/">More</a></div></li>
    </ul></div>
  </div>
</div>
</body></html>
"#;

/// No containers, no season pages: numbers come from episode slugs
pub const SERIES_DETAIL_EPISODE_LINKS: &str = r#"
<html><body>
<h1 class="Title">Show</h1>
<ul class="episodes-list">
  <li><a href="/episodio/show-1x02/">Ep 2</a></li>
  <li><a href="/episodio/show-2x05/">Ep 5</a></li>
  <li><a href="/episodio/show-1x01/">Ep 1</a></li>
  <li><a href="/episodio/show-1x01/">Ep 1 again</a></li>
</ul>
</body></html>
"#;

pub const SERIES_DETAIL_SEASON_LINKS: &str = r#"
<html><body>
<h1 class="Title">Dark</h1>
<div class="Description">Winden, 2019.</div>
<nav class="seasons-nav">
  <a href="/temporada/dark-2/">Temporada 2</a>
  <a href="/temporada/dark-1/">Temporada 1</a>
  <a href="/temporada/dark-1/">T1</a>
</nav>
</body></html>
"#;

pub const SEASON_PAGE_DARK_1: &str = r#"
<html><body><ul>
  <li><a href="/episodio/dark-1x01/">Origen</a></li>
</ul></body></html>
"#;

pub const SEASON_PAGE_DARK_2: &str = r#"
<html><body><ul>
  <li><article class="TPost"><a href="/episodio/dark-2x02/"><h2 class="Title">Mentiras</h2></a></article></li>
  <li><article class="TPost"><a href="/episodio/dark-2x01/"><img src="/img/d21.jpg"><h2 class="Title">Secretos</h2></a></article></li>
</ul></body></html>
"#;

/// Player options: two resolved through AJAX, one direct, one that fails
pub const EPISODE_WITH_PLAYERS: &str = r#"
<html><body>
<div id="playeroptions"><ul id="playeroptionsul">
  <li class="dooplay_player_option" data-type="tv" data-post="4512" data-nume="1"><span class="title">Latino</span></li>
  <li class="dooplay_player_option" data-type="tv" data-post="4512" data-nume="2"><span class="title">Subtitulado</span></li>
  <li class="dooplay_player_option" data-video="https://player.test/direct/3"><span class="title">Directo</span></li>
  <li class="dooplay_player_option" data-type="tv" data-post="4512" data-nume="trailer"><span class="title">Trailer</span></li>
</ul></div>
<script>var sources = [{file: "https://cdn.test/never.m3u8"}];</script>
</body></html>
"#;

pub const EPISODE_WITHOUT_SERVERS: &str = r#"
<html><body><h1>Episodio</h1><p>Sin servidores disponibles.</p></body></html>
"#;

pub const EPISODE_INLINE_SOURCES: &str = r#"
<html><body><div class="player"></div>
<script>jwplayer("p").setup({ sources: [{file: 'https://cdn.test/ep.m3u8', label: '1080p'}] });</script>
</body></html>
"#;

pub const MOVIE_LIST: &str = r#"
<html><body><div class="items">
  <article class="item movies">
    <div class="poster"><img src="/img/heat.jpg"><div class="rating">8.3</div></div>
    <div class="data"><h3><a href="/pelicula/heat/">Heat</a></h3><span>1995</span></div>
  </article>
  <article class="item movies"><div class="data"><h3>Roto</h3></div></article>
</div></body></html>
"#;

pub const MOVIE_DETAIL: &str = r#"
<html><body>
<div class="sheader">
  <div class="poster"><img src="/img/heat-poster.jpg"></div>
  <div class="data">
    <h1>Heat</h1>
    <div class="extra"><span class="date">1995</span> <span class="runtime">170 Min.</span></div>
    <div class="sgeneros"><a href="/genero/accion/">Acción</a><a href="/genero/crimen/">Crimen</a></div>
  </div>
</div>
<div class="wp-content"><p>Un ladrón y un detective.</p></div>
<div class="persons"><a href="/cast/al-pacino/">Al Pacino</a><a href="/cast/robert-de-niro/">Robert De Niro</a></div>
<ul class="playeroptions">
  <li data-video="https://player.test/heat/1"><span class="title">Opción 1</span><span class="quality">HD</span></li>
  <li data-video="https://player.test/heat/1"><span class="title">Duplicado</span></li>
</ul>
</body></html>
"#;

pub const SEARCH_RESULTS: &str = r#"
<html><body><div class="search-page">
  <article class="TPost B"><a href="/serie/dark/"><h2 class="Title">Dark</h2></a><span class="Qlty">2017</span></article>
  <article class="TPost B"><a href="/pelicula/dark-city/"><h2 class="Title">Dark City</h2></a><span class="type">Película</span></article>
  <article class="TPost B"><a href="/dark-waters/"><h2 class="Title">Dark Waters</h2></a><span class="type">TV</span></article>
  <article class="TPost B"><a href="/the-dark/"><h2 class="Title">The Dark</h2></a></article>
</div></body></html>
"#;

/// In-memory [`PageFetcher`]: unknown pages answer 404, unknown player
/// options answer 500. Every request is recorded in order.
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, Result<String, FetchError>>,
    players: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), Ok(body.to_string()));
        self
    }

    pub fn failing(mut self, url: &str, error: FetchError) -> Self {
        self.pages.insert(url.to_string(), Err(error));
        self
    }

    pub fn player(mut self, post: &str, nume: &str, body: &str) -> Self {
        self.players
            .insert(format!("{}/{}", post, nume), body.to_string());
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(format!("GET {}", url));
        self.pages
            .get(url)
            .cloned()
            .unwrap_or(Err(FetchError::Status(404)))
    }

    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
        referer: &str,
    ) -> Result<String, FetchError> {
        let field = |name: &str| {
            form.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| *value)
                .unwrap_or_default()
        };
        let key = format!("{}/{}", field("post"), field("nume"));

        self.requests.lock().unwrap().push(format!(
            "POST {} {} type={} action={} referer={}",
            url,
            key,
            field("type"),
            field("action"),
            referer
        ));
        self.players
            .get(&key)
            .cloned()
            .ok_or(FetchError::Status(500))
    }
}
