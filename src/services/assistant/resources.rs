//! Resource Catalog
//!
//! Curated learning links keyed by subject and subtopic. Used to enrich
//! study suggestions and as an offline fallback.

use crate::models::ResourceLink;

type Entry = (&'static str, &'static str, &'static str);

struct Subtopic {
    key: &'static str,
    links: &'static [Entry],
}

struct Subject {
    key: &'static str,
    /// Non-empty; the first entry doubles as the subject-level fallback.
    subtopics: &'static [Subtopic],
}

const CATALOG: &[Subject] = &[
    Subject {
        key: "mathematics",
        subtopics: &[
            Subtopic {
                key: "calculus",
                links: &[
                    (
                        "Khan Academy - Calculus",
                        "https://www.khanacademy.org/math/calculus-1",
                        "Comprehensive calculus course with practice problems",
                    ),
                    (
                        "Paul's Online Math Notes - Calculus I",
                        "https://tutorial.math.lamar.edu/Classes/CalcI/CalcI.aspx",
                        "Detailed calculus notes with examples and practice problems",
                    ),
                    (
                        "MIT OCW - Single Variable Calculus",
                        "https://ocw.mit.edu/courses/18-01sc-single-variable-calculus-fall-2010/",
                        "MIT's complete single variable calculus course",
                    ),
                ],
            },
            Subtopic {
                key: "algebra",
                links: &[
                    (
                        "Khan Academy - Algebra",
                        "https://www.khanacademy.org/math/algebra",
                        "Complete algebra course from basics to advanced topics",
                    ),
                    (
                        "Purplemath - Algebra Lessons",
                        "https://www.purplemath.com/modules/",
                        "Step-by-step algebra tutorials and examples",
                    ),
                ],
            },
            Subtopic {
                key: "statistics",
                links: &[
                    (
                        "Khan Academy - Statistics",
                        "https://www.khanacademy.org/math/statistics-probability",
                        "Statistics and probability with interactive exercises",
                    ),
                    (
                        "StatTrek - Statistics Tutorial",
                        "https://stattrek.com/",
                        "Comprehensive statistics tutorials and tools",
                    ),
                ],
            },
        ],
    },
    Subject {
        key: "computer science",
        subtopics: &[
            Subtopic {
                key: "programming",
                links: &[
                    (
                        "freeCodeCamp",
                        "https://www.freecodecamp.org/",
                        "Free coding bootcamp with hands-on projects",
                    ),
                    (
                        "Codecademy",
                        "https://www.codecademy.com/",
                        "Interactive coding lessons and projects",
                    ),
                ],
            },
            Subtopic {
                key: "data structures",
                links: &[
                    (
                        "VisuAlgo - Data Structures Visualizations",
                        "https://visualgo.net/",
                        "Interactive visualizations of data structures and algorithms",
                    ),
                    (
                        "GeeksforGeeks - Data Structures",
                        "https://www.geeksforgeeks.org/data-structures/",
                        "Comprehensive data structures tutorials with examples",
                    ),
                ],
            },
            Subtopic {
                key: "algorithms",
                links: &[
                    (
                        "Algorithm Visualizer",
                        "https://algorithm-visualizer.org/",
                        "Interactive algorithm visualizations",
                    ),
                    (
                        "LeetCode",
                        "https://leetcode.com/",
                        "Programming practice problems and solutions",
                    ),
                ],
            },
        ],
    },
    Subject {
        key: "physics",
        subtopics: &[Subtopic {
            key: "physics",
            links: &[
                (
                    "Khan Academy - Physics",
                    "https://www.khanacademy.org/science/physics",
                    "Complete physics course with simulations",
                ),
                (
                    "PhET Interactive Simulations",
                    "https://phet.colorado.edu/",
                    "Interactive physics simulations from University of Colorado",
                ),
                (
                    "MIT OCW - Physics",
                    "https://ocw.mit.edu/courses/physics/",
                    "MIT physics courses and materials",
                ),
            ],
        }],
    },
    Subject {
        key: "chemistry",
        subtopics: &[Subtopic {
            key: "chemistry",
            links: &[
                (
                    "Khan Academy - Chemistry",
                    "https://www.khanacademy.org/science/chemistry",
                    "Complete chemistry course with practice problems",
                ),
                (
                    "ChemCollective",
                    "http://chemcollective.org/",
                    "Virtual chemistry labs and simulations",
                ),
                (
                    "Organic Chemistry Portal",
                    "https://www.organic-chemistry.org/",
                    "Comprehensive organic chemistry resources",
                ),
            ],
        }],
    },
    Subject {
        key: "biology",
        subtopics: &[Subtopic {
            key: "biology",
            links: &[
                (
                    "Khan Academy - Biology",
                    "https://www.khanacademy.org/science/biology",
                    "Complete biology course with interactive content",
                ),
                (
                    "Crash Course Biology",
                    "https://www.youtube.com/playlist?list=PL3EED4C1D684D3ADF",
                    "Engaging biology video series",
                ),
                (
                    "MIT OCW - Biology",
                    "https://ocw.mit.edu/courses/biology/",
                    "MIT biology courses and resources",
                ),
            ],
        }],
    },
];

const GENERAL: &[Entry] = &[
    (
        "Coursera",
        "https://www.coursera.org/",
        "University-level courses from top institutions",
    ),
    (
        "edX",
        "https://www.edx.org/",
        "High-quality courses from universities worldwide",
    ),
    (
        "YouTube Education",
        "https://www.youtube.com/education",
        "Educational content from trusted creators",
    ),
    (
        "Wikipedia",
        "https://en.wikipedia.org/",
        "Comprehensive encyclopedia with reliable information",
    ),
];

/// Number of general resources returned when nothing matches.
const GENERAL_FALLBACK_COUNT: usize = 2;

fn to_links(entries: &[Entry]) -> Vec<ResourceLink> {
    entries
        .iter()
        .map(|(title, url, description)| ResourceLink::new(*title, *url, *description))
        .collect()
}

/// Either string contains the other. Empty topics never match.
fn overlaps(topic: &str, key: &str) -> bool {
    !topic.is_empty() && (topic.contains(key) || key.contains(topic))
}

/// Curated links for `topic`, matched case-insensitively.
///
/// A subtopic match wins; a subject match returns the subject's first
/// subtopic; anything else gets a couple of general resources.
pub fn resources_for_topic(topic: &str) -> Vec<ResourceLink> {
    let topic = topic.trim().to_lowercase();

    for subject in CATALOG {
        if let Some(subtopic) = subject.subtopics.iter().find(|s| overlaps(&topic, s.key)) {
            return to_links(subtopic.links);
        }
        if overlaps(&topic, subject.key) {
            if let Some(first) = subject.subtopics.first() {
                return to_links(first.links);
            }
        }
    }

    to_links(&GENERAL[..GENERAL_FALLBACK_COUNT])
}
