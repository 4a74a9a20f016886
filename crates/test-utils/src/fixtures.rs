//! SDL and document fixtures.

/// A small schema with deprecated fields, arguments, input fields and enum values.
pub const SCHEMA_WITH_DEPRECATIONS: &str = r#"
type Query {
    user(id: ID!): User
    oldUser(id: ID!): User @deprecated(reason: "Use user instead")
    posts(filter: PostFilter, status: PostStatus, first: Int, limit: Int @deprecated(reason: "Use first")): [Post!]!
    search(terms: [SearchTerm!]): [Post!]!
}

type Mutation {
    createPost(input: PostInput!): Post
}

type User {
    id: ID!
    name: String!
    email: String!
    username: String @deprecated(reason: "Use name instead")
    legacyId: ID @deprecated
    posts(status: PostStatus): [Post!]!
}

type Post {
    id: ID!
    title: String!
    author: User
}

enum PostStatus {
    PUBLISHED
    DRAFT
    ARCHIVED @deprecated(reason: "Use DRAFT instead")
}

input PostFilter {
    status: PostStatus
    authorId: ID
    tag: String @deprecated(reason: "Use tags")
    tags: [String!]
}

input SearchTerm {
    text: String!
    fuzzy: Boolean @deprecated(reason: "Always fuzzy now")
}

input PostInput {
    title: String!
    status: PostStatus = DRAFT
}

directive @old(limit: Int @deprecated(reason: "No limit anymore"), mode: PostStatus) on FIELD
"#;

/// Schema without any deprecated element.
pub const BASIC_SCHEMA: &str = r"
type Query {
    user(id: ID!): User
    users(first: Int): [User!]!
}

type User {
    id: ID!
    name: String!
    friends: [User!]!
}

directive @cached(ttl: Int) on FIELD | QUERY
";
