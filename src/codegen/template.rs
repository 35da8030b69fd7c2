//! Fixed C++ text surrounding every generated program.
//!
//! The preamble declares `BrainfuckTape`, a zero-initialized byte buffer that
//! doubles its capacity whenever the cursor moves past either end, and opens
//! `main()` with a tape instance in scope. The postamble closes `main()`.
//!
//! Invariant kept by the class: `min_ptr <= ptr <= max_ptr` after every
//! public method returns. Moves grow the buffer *before* the cursor is moved.

const TAPE_SIZE_PLACEHOLDER: &str = "@TAPE_SIZE@";

const PREAMBLE: &str = r#"#include <cstddef>
#include <cstring>
#include <iostream>

class BrainfuckTape {
private:
    unsigned char* tape;
    std::size_t capacity;
    std::size_t ptr;
    std::size_t min_ptr;
    std::size_t max_ptr;

    void expand_tape_left() {
        std::size_t new_capacity = capacity * 2;
        unsigned char* new_tape = new unsigned char[new_capacity];

        // Old cells go to the upper half, the lower half starts zeroed
        std::memset(new_tape, 0, capacity);
        std::memcpy(new_tape + capacity, tape, capacity);

        delete[] tape;
        tape = new_tape;

        // Same logical cell, new physical index
        ptr += capacity;
        max_ptr += capacity;
        capacity = new_capacity;
    }

    void expand_tape_right() {
        std::size_t new_capacity = capacity * 2;
        unsigned char* new_tape = new unsigned char[new_capacity];

        // Old cells stay in the lower half, the upper half starts zeroed
        std::memcpy(new_tape, tape, capacity);
        std::memset(new_tape + capacity, 0, capacity);

        delete[] tape;
        tape = new_tape;

        max_ptr = new_capacity - 1;
        capacity = new_capacity;
    }

    BrainfuckTape(const BrainfuckTape&);
    BrainfuckTape& operator=(const BrainfuckTape&);

public:
    BrainfuckTape() {
        capacity = @TAPE_SIZE@;
        tape = new unsigned char[capacity];
        std::memset(tape, 0, capacity);
        ptr = 0;
        min_ptr = 0;
        max_ptr = capacity - 1;
    }

    ~BrainfuckTape() {
        delete[] tape;
    }

    unsigned char& current() {
        return tape[ptr];
    }

    unsigned char read() const {
        return tape[ptr];
    }

    void move_left() {
        if (ptr == min_ptr) {
            expand_tape_left();
        }
        ptr--;
    }

    void move_right() {
        if (ptr == max_ptr) {
            expand_tape_right();
        }
        ptr++;
    }

    void increment() {
        tape[ptr]++;
    }

    void decrement() {
        tape[ptr]--;
    }

    void input() {
        std::istream::int_type c = std::cin.get();
        if (c != std::istream::traits_type::eof()) {
            tape[ptr] = static_cast<unsigned char>(c);
        }
    }

    void output() {
        std::cout.put(static_cast<char>(tape[ptr]));
    }
};

int main() {
    BrainfuckTape tape;
"#;

const POSTAMBLE: &str = r#"
    return 0;
}
"#;

/// Text preceding the program body, for a tape starting with `tape_size` cells.
pub fn preamble(tape_size: usize) -> String {
    PREAMBLE.replace(TAPE_SIZE_PLACEHOLDER, &tape_size.to_string())
}

/// Text following the program body.
pub fn postamble() -> &'static str {
    POSTAMBLE
}
