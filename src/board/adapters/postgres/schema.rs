//! Diesel schema for board hierarchy persistence.

diesel::table! {
    /// Boards owned by a single principal.
    boards (id) {
        /// Board identifier.
        id -> Uuid,
        /// Owning principal.
        owner_id -> Uuid,
        /// Board name.
        #[max_length = 100]
        name -> Varchar,
        /// Revision used for conditional updates.
        revision -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ordered columns of a board.
    board_columns (id) {
        /// Column identifier.
        id -> Uuid,
        /// Owning principal.
        owner_id -> Uuid,
        /// Parent board.
        board_id -> Uuid,
        /// Column name.
        #[max_length = 100]
        name -> Varchar,
        /// Sibling position.
        position -> Int8,
        /// `appended` or `explicit`.
        #[max_length = 16]
        placement -> Varchar,
        /// Revision used for conditional updates.
        revision -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ordered tasks of a column.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning principal.
        owner_id -> Uuid,
        /// Board of the parent column.
        board_id -> Uuid,
        /// Parent column.
        column_id -> Uuid,
        /// Task title.
        #[max_length = 200]
        title -> Varchar,
        /// Task description.
        description -> Text,
        /// Sibling position.
        position -> Int8,
        /// `appended` or `explicit`.
        #[max_length = 16]
        placement -> Varchar,
        /// Embedded checklist as a JSON array.
        subtasks -> Jsonb,
        /// Revision used for conditional updates.
        revision -> Int8,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(board_columns -> boards (board_id));
diesel::joinable!(tasks -> board_columns (column_id));

diesel::allow_tables_to_appear_in_same_query!(boards, board_columns, tasks);
