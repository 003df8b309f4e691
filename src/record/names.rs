//! Name tables used to build full names.

pub(super) const FIRST_NAMES: &[&str] = &[
    "Aarav",
    "Aditi",
    "Alice",
    "Amit",
    "Ananya",
    "Arjun",
    "Benjamin",
    "Charlotte",
    "Daniel",
    "Deepa",
    "Divya",
    "Emily",
    "Emma",
    "Ethan",
    "Farhan",
    "Gaurav",
    "Grace",
    "Harper",
    "Ishaan",
    "Isha",
    "James",
    "Jessica",
    "Karan",
    "Kavya",
    "Liam",
    "Lucas",
    "Maya",
    "Meera",
    "Michael",
    "Neha",
    "Nikhil",
    "Noah",
    "Olivia",
    "Pooja",
    "Priya",
    "Rahul",
    "Riya",
    "Rohan",
    "Sarah",
    "Sophia",
    "Suresh",
    "Tanvi",
    "Thomas",
    "Varun",
    "Vikram",
    "William",
    "Zara",
];

pub(super) const LAST_NAMES: &[&str] = &[
    "Agarwal",
    "Anderson",
    "Banerjee",
    "Bhatt",
    "Brown",
    "Chopra",
    "Das",
    "Davis",
    "Desai",
    "Garcia",
    "Ghosh",
    "Gupta",
    "Iyer",
    "Jackson",
    "Johnson",
    "Joshi",
    "Kapoor",
    "Khan",
    "Kumar",
    "Lee",
    "Martin",
    "Mehta",
    "Miller",
    "Mishra",
    "Moore",
    "Nair",
    "Patel",
    "Pillai",
    "Rao",
    "Reddy",
    "Roy",
    "Shah",
    "Sharma",
    "Singh",
    "Smith",
    "Taylor",
    "Thomas",
    "Verma",
    "Wilson",
    "Yadav",
];
