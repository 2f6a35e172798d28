// patterns.rs - Built-in pattern library, stored in the same text format as pattern files

pub struct Pattern {
    pub name: &'static str,
    pub text: &'static str,
}

pub const PATTERNS: &[Pattern] = &[
    Pattern {
        name: "Glider",
        text: "#Life 1.05\n#P -1 -1\n.*.\n..*\n***\n",
    },
    Pattern {
        name: "Blinker",
        text: "#Life 1.05\n#P -1 0\n***\n",
    },
    Pattern {
        name: "Toad",
        text: "#Life 1.05\n#P -2 -1\n.***\n***.\n",
    },
    Pattern {
        name: "Beacon",
        // Two blocks touching at a corner.
        text: "#Life 1.05\n#P 0 0\n**\n**\n#P 2 2\n**\n**\n",
    },
    Pattern {
        name: "Pulsar",
        text: "#Life 1.05\n#D period 3 oscillator\n#P -6 -6\n\
               ..***...***..\n\
               .............\n\
               *....*.*....*\n\
               *....*.*....*\n\
               *....*.*....*\n\
               ..***...***..\n\
               .............\n\
               ..***...***..\n\
               *....*.*....*\n\
               *....*.*....*\n\
               *....*.*....*\n\
               .............\n\
               ..***...***..\n",
    },
    Pattern {
        name: "R-pentomino",
        text: "#Life 1.05\n#P -1 -1\n.**\n**.\n.*.\n",
    },
    Pattern {
        name: "Gosper Glider Gun",
        text: "#Life 1.05\n#D Bill Gosper, 1970\n#P -18 -4\n\
               ........................*...........\n\
               ......................*.*...........\n\
               ............**......**............**\n\
               ...........*...*....**............**\n\
               **........*.....*...**..............\n\
               **........*...*.**....*.*...........\n\
               ..........*.....*.......*...........\n\
               ...........*...*....................\n\
               ............**......................\n",
    },
];

pub fn names() -> impl Iterator<Item = &'static str> {
    PATTERNS.iter().map(|p| p.name)
}

pub fn find(name: &str) -> Option<&'static Pattern> {
    PATTERNS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}
