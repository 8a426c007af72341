//! Test fixtures for common test scenarios.
//!
//! A trimmed-down chemfiles header exercising every classification rule
//! and every mapping path: opaque handles, enums by value and by pointer,
//! void functions, pointer returns and a function no type claims.

/// A small chemfiles-like C API.
pub const CHEMFILES_HEADER: &str = r#"/* Chemfiles, a library for chemistry file reading and writing */
#ifndef CHEMFILES_H
#define CHEMFILES_H

#include <stdint.h>
#include <stdbool.h>

#ifdef __cplusplus
extern "C" {
#endif

/// Status code of every fallible function
typedef enum {
    CHFL_SUCCESS = 0,
    CHFL_MEMORY_ERROR = 1,
    CHFL_FILE_ERROR = 2,
    CHFL_FORMAT_ERROR = 3,
} chfl_status;

typedef enum chfl_cellshape {
    CHFL_CELL_ORTHORHOMBIC = 0,
    CHFL_CELL_TRICLINIC = 1,
    CHFL_CELL_INFINITE = 2,
} chfl_cellshape;

typedef struct CHFL_TRAJECTORY CHFL_TRAJECTORY;
typedef struct CHFL_FRAME CHFL_FRAME;
typedef struct CHFL_ATOM CHFL_ATOM;
typedef struct CHFL_CELL CHFL_CELL;
typedef struct CHFL_TOPOLOGY CHFL_TOPOLOGY;
typedef struct CHFL_RESIDUE CHFL_RESIDUE;
typedef struct CHFL_SELECTION CHFL_SELECTION;
typedef struct CHFL_PROPERTY CHFL_PROPERTY;

CHFL_EXPORT const char* chfl_version(void);
CHFL_EXPORT void chfl_clear_errors(void);

CHFL_EXPORT CHFL_TRAJECTORY* chfl_trajectory_open(const char* path, char mode);
CHFL_EXPORT chfl_status chfl_trajectory_read(CHFL_TRAJECTORY* trajectory, CHFL_FRAME* frame);

CHFL_EXPORT CHFL_FRAME* chfl_frame(void);
CHFL_EXPORT chfl_status chfl_frame_atoms_count(const CHFL_FRAME* frame, uint64_t* count);
CHFL_EXPORT CHFL_PROPERTY* chfl_frame_get_property(const CHFL_FRAME* frame, const char* name);

CHFL_EXPORT CHFL_ATOM* chfl_atom(const char* name);
CHFL_EXPORT chfl_status chfl_atom_mass(const CHFL_ATOM* atom, double* mass);
CHFL_EXPORT chfl_status chfl_atom_set_mass(CHFL_ATOM* atom, double mass);
CHFL_EXPORT chfl_status chfl_atom_set_type(CHFL_ATOM* atom, const char* type);

CHFL_EXPORT CHFL_CELL* chfl_cell(const double lengths[3]);
CHFL_EXPORT chfl_status chfl_cell_shape(const CHFL_CELL* cell, chfl_cellshape* shape);
CHFL_EXPORT chfl_status chfl_cell_set_shape(CHFL_CELL* cell, chfl_cellshape shape);

CHFL_EXPORT chfl_status chfl_property_get_double(const CHFL_PROPERTY* property, double* value);
CHFL_EXPORT chfl_status chfl_property_get_bool(const CHFL_PROPERTY* property, bool* value);

CHFL_EXPORT chfl_status chfl_guess_format(const char* path, char* format, uint64_t size);

#ifdef __cplusplus
}
#endif

#endif
"#;

/// Opaque type names of [`CHEMFILES_HEADER`], in registry order.
pub const CHEMFILES_TYPES: [&str; 8] = [
    "Trajectory",
    "Frame",
    "Atom",
    "Cell",
    "Topology",
    "Residue",
    "Selection",
    "Property",
];

/// Free functions of [`CHEMFILES_HEADER`].
pub const CHEMFILES_FREE: [&str; 2] = ["chfl_version", "chfl_clear_errors"];

/// A header whose only function takes a type no backend knows.
pub const FILE_POINTER_HEADER: &str = r#"
typedef struct CHFL_TRAJECTORY CHFL_TRAJECTORY;

CHFL_TRAJECTORY* chfl_trajectory_from_file(FILE* file);
"#;
