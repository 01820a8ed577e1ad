pub mod cardname;
pub mod magicrarity;
pub mod scryfallcard;
pub mod setcode;
