//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the files under `migrations/`. Regenerate
//! with `diesel print-schema` after changing a migration.

diesel::table! {
    /// Accounts allowed to sign in.
    users (username) {
        username -> Varchar,
        /// Argon2 PHC string; never the plaintext password.
        password_hash -> Text,
    }
}

diesel::table! {
    /// Animal records keyed by SINIIGA tag.
    animals (siniiga) {
        siniiga -> Varchar,
        race -> Varchar,
        birthdate -> Date,
        birth_weight -> Float8,
        /// Relative photo path (`images/<name>`).
        photo_path -> Nullable<Text>,
        /// Father's tag; cleared when the father is deleted.
        father -> Nullable<Varchar>,
        /// Mother's tag; cleared when the mother is deleted.
        mother -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Vaccine catalogue.
    vaccines (name) {
        name -> Varchar,
    }
}

diesel::table! {
    /// Vaccines administered to animals.
    vaccine_applications (id) {
        id -> Int4,
        siniiga -> Varchar,
        vaccine_name -> Varchar,
        dose -> Float8,
        application_date -> Date,
    }
}

diesel::joinable!(vaccine_applications -> animals (siniiga));
diesel::joinable!(vaccine_applications -> vaccines (vaccine_name));

diesel::allow_tables_to_appear_in_same_query!(animals, users, vaccine_applications, vaccines);
