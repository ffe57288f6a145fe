//! Static NHL team table: names, tri-codes, nicknames and league placement.

/// One franchise entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Team {
    pub name: &'static str,
    pub id: u32,
    pub tri_code: &'static str,
    pub nickname: &'static [&'static str],
    pub active: bool,
    pub division: &'static str,
    pub conference: &'static str,
    /// Primary colour, used for embeds.
    pub colour: u32,
}

impl Team {
    /// All-star teams ("Team Atlantic", ...) are never valid lookup targets.
    pub fn is_all_star(&self) -> bool {
        self.name.contains("Team")
    }
}

macro_rules! team {
    ($name:literal, $id:literal, $tri:literal, [$($nick:literal),*], $active:literal, $div:literal, $conf:literal, $colour:literal) => {
        Team {
            name: $name,
            id: $id,
            tri_code: $tri,
            nickname: &[$($nick),*],
            active: $active,
            division: $div,
            conference: $conf,
            colour: $colour,
        }
    };
}

pub static TEAMS: &[Team] = &[
    team!("Anaheim Ducks", 24, "ANA", ["Ducks"], true, "Pacific", "Western", 0xF47A38),
    team!("Boston Bruins", 6, "BOS", ["Bruins", "Bs"], true, "Atlantic", "Eastern", 0xFFB81C),
    team!("Buffalo Sabres", 7, "BUF", ["Sabres"], true, "Atlantic", "Eastern", 0x002654),
    team!("Calgary Flames", 20, "CGY", ["Flames"], true, "Pacific", "Western", 0xC8102E),
    team!("Carolina Hurricanes", 12, "CAR", ["Hurricanes", "Canes"], true, "Metropolitan", "Eastern", 0xCC0000),
    team!("Chicago Blackhawks", 16, "CHI", ["Blackhawks", "Hawks"], true, "Central", "Western", 0xCF0A2C),
    team!("Colorado Avalanche", 21, "COL", ["Avalanche", "Avs"], true, "Central", "Western", 0x6F263D),
    team!("Columbus Blue Jackets", 29, "CBJ", ["Jackets", "CBJ"], true, "Metropolitan", "Eastern", 0x002654),
    team!("Dallas Stars", 25, "DAL", ["Stars"], true, "Central", "Western", 0x006847),
    team!("Detroit Red Wings", 17, "DET", ["Wings"], true, "Atlantic", "Eastern", 0xCE1126),
    team!("Edmonton Oilers", 22, "EDM", ["Oilers"], true, "Pacific", "Western", 0xFF4C00),
    team!("Florida Panthers", 13, "FLA", ["Panthers", "Cats"], true, "Atlantic", "Eastern", 0xC8102E),
    team!("Los Angeles Kings", 26, "LAK", ["Kings"], true, "Pacific", "Western", 0x111111),
    team!("Minnesota Wild", 30, "MIN", ["Wild"], true, "Central", "Western", 0x154734),
    team!("Montréal Canadiens", 8, "MTL", ["Canadiens", "Montreal", "Habs"], true, "Atlantic", "Eastern", 0xAF1E2D),
    team!("Nashville Predators", 18, "NSH", ["Predators", "Preds"], true, "Central", "Western", 0xFFB81C),
    team!("New Jersey Devils", 1, "NJD", ["Devils"], true, "Metropolitan", "Eastern", 0xCE1126),
    team!("New York Islanders", 2, "NYI", ["Islanders", "Isles"], true, "Metropolitan", "Eastern", 0x00539B),
    team!("New York Rangers", 3, "NYR", ["Rangers"], true, "Metropolitan", "Eastern", 0x0038A8),
    team!("Ottawa Senators", 9, "OTT", ["Senators", "Sens"], true, "Atlantic", "Eastern", 0xC52032),
    team!("Philadelphia Flyers", 4, "PHI", ["Flyers"], true, "Metropolitan", "Eastern", 0xF74902),
    team!("Pittsburgh Penguins", 5, "PIT", ["Penguins", "Pens"], true, "Metropolitan", "Eastern", 0xFCB514),
    team!("San Jose Sharks", 28, "SJS", ["Sharks"], true, "Pacific", "Western", 0x006D75),
    team!("Seattle Kraken", 55, "SEA", ["Kraken"], true, "Pacific", "Western", 0x001628),
    team!("St. Louis Blues", 19, "STL", ["Blues"], true, "Central", "Western", 0x002F87),
    team!("Tampa Bay Lightning", 14, "TBL", ["Lightning", "Bolts"], true, "Atlantic", "Eastern", 0x002868),
    team!("Toronto Maple Leafs", 10, "TOR", ["Leafs"], true, "Atlantic", "Eastern", 0x00205B),
    team!("Utah Mammoth", 68, "UTA", ["Mammoth", "Utah"], true, "Central", "Western", 0x71AFE5),
    team!("Vancouver Canucks", 23, "VAN", ["Canucks", "Nucks"], true, "Pacific", "Western", 0x00205B),
    team!("Vegas Golden Knights", 54, "VGK", ["Knights", "Vegas"], true, "Pacific", "Western", 0xB4975A),
    team!("Washington Capitals", 15, "WSH", ["Capitals", "Caps"], true, "Metropolitan", "Eastern", 0xC8102E),
    team!("Winnipeg Jets", 52, "WPG", ["Jets"], true, "Central", "Western", 0x041E42),
    // Relocated or defunct franchises
    team!("Arizona Coyotes", 53, "ARI", ["Coyotes", "Yotes"], false, "Central", "Western", 0x8C2633),
    team!("Atlanta Thrashers", 11, "ATL", ["Thrashers"], false, "Southeast", "Eastern", 0x041E42),
    team!("Hartford Whalers", 34, "HFD", ["Whalers"], false, "Adams", "Wales", 0x00843D),
    team!("Minnesota North Stars", 31, "MNS", [], false, "Norris", "Campbell", 0x006847),
    team!("Quebec Nordiques", 32, "QUE", ["Nordiques"], false, "Adams", "Wales", 0x0055A4),
    // All-star teams
    team!("Team Atlantic", 87, "ATL", [], true, "Atlantic", "Eastern", 0x000000),
    team!("Team Metropolitan", 88, "MET", [], true, "Metropolitan", "Eastern", 0x000000),
    team!("Team Central", 89, "CEN", [], true, "Central", "Western", 0x000000),
    team!("Team Pacific", 90, "PAC", [], true, "Pacific", "Western", 0x000000),
];

pub const DIVISIONS: [&str; 4] = ["Metropolitan", "Atlantic", "Central", "Pacific"];
pub const CONFERENCES: [&str; 2] = ["Eastern", "Western"];

/// Finds a team by its exact name.
pub fn by_name(name: &str) -> Option<&'static Team> {
    TEAMS.iter().find(|team| team.name == name)
}

/// Finds a franchise (not an all-star team) by tri-code, preferring active franchises.
pub fn by_tri_code(code: &str) -> Option<&'static Team> {
    let mut candidates = TEAMS
        .iter()
        .filter(|team| !team.is_all_star() && team.tri_code.eq_ignore_ascii_case(code));
    let first = candidates.next()?;
    if first.active {
        Some(first)
    } else {
        candidates.find(|team| team.active).or(Some(first))
    }
}

/// Name to show for a tri-code that may not be in the table.
pub fn display_name(code: &str) -> String {
    by_tri_code(code)
        .map(|team| team.name.to_string())
        .unwrap_or_else(|| code.to_string())
}
