pub mod musicbrainz;
pub mod openai;
pub mod spotify;
pub mod wikipedia;

pub use musicbrainz::{MusicBrainzClient, MusicBrainzConfig};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use spotify::{SpotifyClient, SpotifyConfig};
pub use wikipedia::{WikipediaClient, WikipediaConfig};
